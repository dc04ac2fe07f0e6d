pub mod prompt;

use keyring::Entry;
use std::fmt;

const SERVICE_NAME: &str = "buffett-score";
const KEY_USER: &str = "alpha-vantage-key";

/// Environment variable name for providing the Alpha Vantage key without keyring
pub const ENV_KEY_VAR: &str = "ALPHA_VANTAGE_KEY";

// Re-export prompt functions for convenience
pub use prompt::{prompt_for_key, replace_stored_key, resolve_api_key};

/// Check for an API key in the ALPHA_VANTAGE_KEY environment variable.
/// Returns Some(key) if the env var is set and non-empty, None otherwise.
pub fn get_key_from_env() -> Option<String> {
    key_from_value(std::env::var(ENV_KEY_VAR).ok())
}

fn key_from_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug)]
pub enum CredentialError {
    KeyringUnavailable(String),
    KeyNotFound,
    StoreFailed(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::KeyringUnavailable(msg) => write!(f, "Keyring unavailable: {}", msg),
            CredentialError::KeyNotFound => write!(f, "API key not found in keyring"),
            CredentialError::StoreFailed(msg) => write!(f, "Failed to store API key: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

fn get_key_sync() -> Result<String, CredentialError> {
    let entry = Entry::new(SERVICE_NAME, KEY_USER)
        .map_err(|e| CredentialError::KeyringUnavailable(format!("{}", e)))?;

    entry.get_password().map_err(|e| match e {
        keyring::Error::NoEntry => CredentialError::KeyNotFound,
        _ => CredentialError::KeyringUnavailable(format!("{}", e)),
    })
}

fn store_key_sync(key: &str) -> Result<(), CredentialError> {
    let entry = Entry::new(SERVICE_NAME, KEY_USER)
        .map_err(|e| CredentialError::KeyringUnavailable(format!("{}", e)))?;

    entry
        .set_password(key)
        .map_err(|e| CredentialError::StoreFailed(format!("{}", e)))
}

/// Read the stored API key from the system keyring.
/// Uses spawn_blocking to prevent blocking the async runtime
pub async fn get_stored_key() -> Result<String, CredentialError> {
    tokio::task::spawn_blocking(get_key_sync)
        .await
        .map_err(|e| CredentialError::KeyringUnavailable(format!("Task join error: {}", e)))?
}

/// Store the API key in the system keyring, replacing any previous one.
/// Uses spawn_blocking to prevent blocking the async runtime
pub async fn store_key(key: String) -> Result<(), CredentialError> {
    tokio::task::spawn_blocking(move || store_key_sync(&key))
        .await
        .map_err(|e| CredentialError::KeyringUnavailable(format!("Task join error: {}", e)))?
}
