//! OS keychain adapter for the Pulumi access token.
//!
//! Uses the `keyring` crate:
//! - macOS Keychain
//! - Linux Secret Service (GNOME Keyring, KDE Wallet)
//! - Windows Credential Manager

use copilot_core::auth::credential::CredentialStore;
use copilot_types::error::CopilotError;

/// Keychain-backed [`CredentialStore`] holding a single token.
pub struct KeychainCredentialStore {
    service_name: String,
    account: String,
}

impl KeychainCredentialStore {
    /// Store under service "pulumi-copilot", account "access-token".
    pub fn new() -> Self {
        Self::with_service("pulumi-copilot")
    }

    /// Use a custom service name (useful for testing).
    pub fn with_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            account: "access-token".to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, CopilotError> {
        keyring::Entry::new(&self.service_name, &self.account)
            .map_err(|e| CopilotError::Credential(format!("keychain entry error: {e}")))
    }
}

impl Default for KeychainCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeychainCredentialStore {
    async fn load(&self) -> Result<Option<String>, CopilotError> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CopilotError::Credential(format!("keychain get error: {e}"))),
        }
    }

    async fn store(&self, token: &str) -> Result<(), CopilotError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| CopilotError::Credential(format!("keychain set error: {e}")))
    }

    async fn clear(&self) -> Result<bool, CopilotError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(CopilotError::Credential(format!(
                "keychain delete error: {e}"
            ))),
        }
    }
}
