use anyhow::{Context, Result};

use super::{get_key_from_env, get_stored_key, store_key, CredentialError, ENV_KEY_VAR};

/// Prompts user to enter the Alpha Vantage API key (input hidden)
pub fn prompt_for_key() -> Result<String> {
    eprintln!("Alpha Vantage API key required.");
    eprintln!("Get a free key at: https://www.alphavantage.co/support/#api-key");
    eprintln!();

    let key = rpassword::prompt_password("Enter API key: ")
        .context("Failed to read API key from terminal")?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Ok(key.to_string())
}

/// Find the API key: environment first, then keyring, then ask and store.
pub async fn resolve_api_key() -> Result<String> {
    if let Some(key) = get_key_from_env() {
        tracing::debug!("Using API key from {}", ENV_KEY_VAR);
        return Ok(key);
    }

    match get_stored_key().await {
        Ok(key) => {
            tracing::debug!("Using API key from system keyring");
            Ok(key)
        }
        Err(CredentialError::KeyNotFound) => {
            let key = prompt_for_key()?;

            store_key(key.clone())
                .await
                .context("Failed to store API key in keyring")?;

            eprintln!("API key stored securely in system keyring.");
            Ok(key)
        }
        Err(CredentialError::KeyringUnavailable(msg)) => {
            anyhow::bail!(
                "System keyring unavailable. Set {} instead.\nError: {}",
                ENV_KEY_VAR,
                msg
            );
        }
        Err(e) => {
            anyhow::bail!("Failed to access keyring: {}", e);
        }
    }
}

/// Ask for a new key and replace whatever the keyring holds
pub async fn replace_stored_key() -> Result<()> {
    let key = prompt_for_key()?;

    store_key(key)
        .await
        .context("Failed to store API key in keyring")?;

    eprintln!("API key stored securely in system keyring.");
    Ok(())
}
