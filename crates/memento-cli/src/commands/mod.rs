pub mod check;
pub mod common;
pub mod completions;
pub mod encode;
pub mod notes;
pub mod photos;
pub mod status;
pub mod walk;
