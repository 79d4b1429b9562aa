//
//  hubrest
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Decides what goes into the `Authorization` header of a request.
//!
//! ## Credential Specifiers
//!
//! Every request carries an [`Auth`] value chosen by the caller:
//!
//! - [`Auth::Default`]: look up a token stored under the default identity
//! - [`Auth::Token`]: use the given string verbatim as the token
//! - [`Auth::Identity`]: look up a token stored under a named identity
//! - [`Auth::Basic`]: HTTP Basic authentication with the user's password
//! - [`Auth::None`]: send no `Authorization` header
//!
//! ## Collaborators
//!
//! The resolver in [`resolver`] depends only on three traits:
//!
//! - [`CredentialStore`]: where secrets live ([`KeyringStore`] by default)
//! - [`UsernameResolver`]: which user to authenticate as per host
//!   ([`Config`](crate::Config) implements it)
//! - [`CredentialProvider`]: what to do when no secret is stored, such as
//!   creating a token or prompting; [`NoCredentialProvider`] just fails
//!
//! ## Module Structure
//!
//! - [`keyring`]: system keyring backed [`CredentialStore`]
//! - [`resolver`]: the [`Authenticator`] itself

mod keyring;
mod resolver;

pub use self::keyring::*;
pub use resolver::*;

use std::str::FromStr;

use crate::api::common::{Error, Result};

/// How a request should authenticate.
///
/// # Parsing
///
/// Specifiers can be read from configuration or command lines:
///
/// ```rust
/// use hubrest::auth::Auth;
///
/// assert_eq!("".parse::<Auth>().unwrap(), Auth::Default);
/// assert_eq!("basic".parse::<Auth>().unwrap(), Auth::Basic);
/// assert_eq!("none".parse::<Auth>().unwrap(), Auth::None);
/// assert_eq!("token:abc".parse::<Auth>().unwrap(), Auth::Token("abc".into()));
/// assert_eq!("identity:forge".parse::<Auth>().unwrap(), Auth::Identity("forge".into()));
/// assert!("bearer".parse::<Auth>().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// Token stored under the default identity.
    #[default]
    Default,
    /// A literal token, used as is.
    Token(String),
    /// Token stored under the named identity.
    Identity(String),
    /// HTTP Basic authentication.
    Basic,
    /// No `Authorization` header.
    None,
}

impl FromStr for Auth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "" | "default" => return Ok(Self::Default),
            "basic" => return Ok(Self::Basic),
            "none" => return Ok(Self::None),
            _ => {}
        }
        if let Some(token) = s.strip_prefix("token:").filter(|t| !t.is_empty()) {
            return Ok(Self::Token(token.to_string()));
        }
        if let Some(name) = s.strip_prefix("identity:").filter(|n| !n.is_empty()) {
            return Ok(Self::Identity(name.to_string()));
        }
        Err(Error::InvalidArgument(format!(
            "Unknown credential specifier: {}",
            s
        )))
    }
}

/// Persistent secret storage keyed by host and user.
///
/// The library only reads from the store and invalidates entries; saving is
/// left to whoever creates the credential.
pub trait CredentialStore: Send + Sync {
    /// Looks up the secret for `user` on `host`.
    fn search(&self, host: &str, user: &str) -> Result<Option<String>>;

    /// Drops any entry, including a cached "not found", for `user` on `host`.
    fn forget(&self, host: &str, user: &str) -> Result<()>;

    /// Stores a secret for `user` on `host`.
    fn save(&self, host: &str, user: &str, secret: &str) -> Result<()>;
}

/// Determines the username to authenticate as on a host.
pub trait UsernameResolver: Send + Sync {
    fn resolve(&self, host: &str) -> Result<String>;
}

/// Fallback invoked when the store has no secret.
///
/// Implementations may create a token through the API, prompt the user, or
/// read from elsewhere. They are responsible for saving what they create.
pub trait CredentialProvider: Send + Sync {
    /// Produces a token for `username` under `identity` on `host`.
    fn create_token(&self, host: &str, username: &str, identity: &str) -> Result<String>;

    /// Produces the Basic authentication password for `username` on `host`.
    fn password(&self, host: &str, username: &str) -> Result<String>;
}

/// A provider that never produces a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentialProvider;

impl CredentialProvider for NoCredentialProvider {
    fn create_token(&self, host: &str, username: &str, identity: &str) -> Result<String> {
        Err(Error::MissingCredential {
            host: host.to_string(),
            user: identity_key(username, identity),
        })
    }

    fn password(&self, host: &str, username: &str) -> Result<String> {
        Err(Error::MissingCredential {
            host: host.to_string(),
            user: username.to_string(),
        })
    }
}

/// The store key for a token: `username^identity`.
pub fn identity_key(username: &str, identity: &str) -> String {
    format!("{}^{}", username, identity)
}
