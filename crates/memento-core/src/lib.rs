//! memento-core - Core library for Memento
//!
//! This crate holds the session gate, cross-frame messaging, navigation
//! highlight and catalog logic shared by the site tooling (CLI and tests).

pub mod assets;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod guard;
pub mod login;
pub mod messaging;
pub mod nav;
pub mod session;
pub mod storage;
pub mod theme;
pub mod util;

pub use error::{Error, Result};
pub use session::{AccessToken, SessionState, SessionStore};
