use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] memento_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Username and password cannot be empty")]
    EmptyCredentials,
    #[error("Login rejected: {0}")]
    LoginRejected(String),
    #[error("{0}")]
    Catalog(String),
    #[error("Site check failed: {0} problem(s) found")]
    CheckFailed(usize),
    #[error("Unexpected session state: {0}")]
    Session(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
