//
//  hubrest
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! [`KeyringStore`] keeps secrets in the system's native keyring:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! ## Storage Model
//!
//! - **Service**: `hubrest:<host>`
//! - **User**: the plain username for Basic passwords, `username^identity`
//!   for tokens
//! - **Password**: the secret
//!
//! The keyring keeps no negative cache, so [`CredentialStore::forget`] on a
//! missing entry is a no-op.

use ::keyring::Entry;

use super::CredentialStore;
use crate::api::common::Result;

/// The service name prefix used to identify this library in the keyring.
const SERVICE_NAME: &str = crate::APP_NAME;

/// Secret storage in the platform keyring.
///
/// # Example
///
/// ```rust,no_run
/// use hubrest::auth::{CredentialStore, KeyringStore};
///
/// fn example() -> hubrest::Result<()> {
///     let store = KeyringStore::new();
///     store.save("api.github.com", "octocat^hubrest", "ghp_xxx")?;
///
///     if let Some(token) = store.search("api.github.com", "octocat^hubrest")? {
///         println!("Found token of {} bytes", token.len());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store using the `hubrest` service prefix.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Uses a different service prefix, keeping entries apart from the
    /// default ones.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, host: &str, user: &str) -> Result<Entry> {
        Ok(Entry::new(&format!("{}:{}", self.service, host), user)?)
    }
}

impl CredentialStore for KeyringStore {
    fn search(&self, host: &str, user: &str) -> Result<Option<String>> {
        match self.entry(host, user)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn forget(&self, host: &str, user: &str) -> Result<()> {
        match self.entry(host, user)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(::keyring::Error::NoEntry) => Ok(()), // Already gone
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, host: &str, user: &str, secret: &str) -> Result<()> {
        self.entry(host, user)?.set_password(secret)?;
        Ok(())
    }
}
