use memento_core::login::CredentialRecord;

use crate::error::CliError;

pub fn encode_user(username: &str, password: &str) -> Result<CredentialRecord, CliError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(CliError::EmptyCredentials);
    }
    Ok(CredentialRecord::encode(username, password))
}

pub fn run_encode_user(username: &str, password: &str) -> Result<(), CliError> {
    let record = encode_user(username, password)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
