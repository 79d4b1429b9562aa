//
//  hubrest
//  auth/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authorization Header Resolution
//!
//! [`Authenticator`] turns a credential specifier into the literal value of
//! the `Authorization` header.
//!
//! | Specifier | Username needed | Store key | Header |
//! |-----------|-----------------|-----------|--------|
//! | `Basic` | yes | `username` | `Basic <base64(user:secret)>` |
//! | `Token(t)` | no | none | `token <t>` |
//! | `Default` | yes | `username^<package>` | `token <secret>` |
//! | `Identity(n)` | yes | `username^n` | `token <secret>` |
//! | `None` | no | none | no header |
//!
//! When the store has no secret, the entry is forgotten first and then the
//! [`CredentialProvider`] is asked. Forgetting clears a stale "known absent"
//! entry in stores that cache misses, so a token created moments ago by
//! someone else is found next time.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{identity_key, Auth, CredentialProvider, CredentialStore, UsernameResolver};
use crate::api::common::Result;

/// Resolves `Authorization` header values for one call.
pub struct Authenticator<'a> {
    store: &'a dyn CredentialStore,
    usernames: &'a dyn UsernameResolver,
    provider: &'a dyn CredentialProvider,
    /// Identity name used for [`Auth::Default`].
    package: &'a str,
}

impl<'a> Authenticator<'a> {
    /// Creates a resolver over the given collaborators.
    ///
    /// `package` is the identity used for [`Auth::Default`].
    pub fn new(
        store: &'a dyn CredentialStore,
        usernames: &'a dyn UsernameResolver,
        provider: &'a dyn CredentialProvider,
        package: &'a str,
    ) -> Self {
        Self {
            store,
            usernames,
            provider,
            package,
        }
    }

    /// Produces the `Authorization` header value for `host`.
    ///
    /// Returns `Ok(None)` only for [`Auth::None`].
    ///
    /// # Errors
    ///
    /// - [`Error::MissingUsername`](crate::Error::MissingUsername) when a
    ///   username is needed and none is configured
    /// - [`Error::MissingCredential`](crate::Error::MissingCredential) when
    ///   the store and the provider both come up empty
    /// - store failures such as [`Error::Keyring`](crate::Error::Keyring)
    pub fn authorization(
        &self,
        host: &str,
        auth: &Auth,
        username: Option<&str>,
    ) -> Result<Option<String>> {
        match auth {
            Auth::None => Ok(None),
            Auth::Token(token) => Ok(Some(format!("token {}", token))),
            Auth::Basic => {
                let username = self.username(host, username)?;
                let secret = self.basic_secret(host, &username)?;
                Ok(Some(basic_auth(&username, &secret)))
            }
            Auth::Default => {
                let username = self.username(host, username)?;
                let token = self.token(host, &username, self.package)?;
                Ok(Some(format!("token {}", token)))
            }
            Auth::Identity(identity) => {
                let username = self.username(host, username)?;
                let token = self.token(host, &username, identity)?;
                Ok(Some(format!("token {}", token)))
            }
        }
    }

    fn username(&self, host: &str, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(username) => Ok(username.to_string()),
            None => self.usernames.resolve(host),
        }
    }

    fn token(&self, host: &str, username: &str, identity: &str) -> Result<String> {
        let key = identity_key(username, identity);
        if let Some(token) = self.store.search(host, &key)? {
            tracing::debug!("Found token for {} on {}", key, host);
            return Ok(token);
        }
        tracing::debug!("No token for {} on {}, asking provider", key, host);
        self.store.forget(host, &key)?;
        self.provider.create_token(host, username, identity)
    }

    fn basic_secret(&self, host: &str, username: &str) -> Result<String> {
        if let Some(secret) = self.store.search(host, username)? {
            return Ok(secret);
        }
        self.store.forget(host, username)?;
        self.provider.password(host, username)
    }
}

/// Encodes a username and password as a Basic authentication header value.
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::Error;
    use crate::auth::NoCredentialProvider;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        secrets: HashMap<(String, String), String>,
        calls: Mutex<Vec<String>>,
    }

    impl MemoryStore {
        fn with(mut self, host: &str, user: &str, secret: &str) -> Self {
            self.secrets
                .insert((host.to_string(), user.to_string()), secret.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CredentialStore for MemoryStore {
        fn search(&self, host: &str, user: &str) -> Result<Option<String>> {
            self.calls.lock().unwrap().push(format!("search {} {}", host, user));
            Ok(self.secrets.get(&(host.to_string(), user.to_string())).cloned())
        }

        fn forget(&self, host: &str, user: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("forget {} {}", host, user));
            Ok(())
        }

        fn save(&self, _host: &str, _user: &str, _secret: &str) -> Result<()> {
            unreachable!("the resolver never saves")
        }
    }

    struct Fixed(&'static str);

    impl UsernameResolver for Fixed {
        fn resolve(&self, _host: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Nobody;

    impl UsernameResolver for Nobody {
        fn resolve(&self, host: &str) -> Result<String> {
            Err(Error::MissingUsername(host.to_string()))
        }
    }

    struct Creates;

    impl CredentialProvider for Creates {
        fn create_token(&self, _host: &str, username: &str, identity: &str) -> Result<String> {
            Ok(format!("new-{}-{}", username, identity))
        }

        fn password(&self, _host: &str, _username: &str) -> Result<String> {
            Ok("prompted".to_string())
        }
    }

    const HOST: &str = "api.github.com";

    #[test]
    fn test_literal_token_skips_store() {
        let store = MemoryStore::default();
        let auth = Authenticator::new(&store, &Nobody, &NoCredentialProvider, "hubrest");
        let header = auth
            .authorization(HOST, &Auth::Token("abc123".into()), None)
            .unwrap();
        assert_eq!(header.as_deref(), Some("token abc123"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_default_uses_package_identity() {
        let store = MemoryStore::default().with(HOST, "octocat^hubrest", "t0k");
        let auth = Authenticator::new(&store, &Fixed("octocat"), &NoCredentialProvider, "hubrest");
        let header = auth.authorization(HOST, &Auth::Default, None).unwrap();
        assert_eq!(header.as_deref(), Some("token t0k"));
        assert_eq!(store.calls(), vec!["search api.github.com octocat^hubrest"]);
    }

    #[test]
    fn test_named_identity() {
        let store = MemoryStore::default().with(HOST, "octocat^forge", "f0rge");
        let auth = Authenticator::new(&store, &Fixed("octocat"), &NoCredentialProvider, "hubrest");
        let header = auth
            .authorization(HOST, &Auth::Identity("forge".into()), None)
            .unwrap();
        assert_eq!(header.as_deref(), Some("token f0rge"));
        assert_eq!(store.calls(), vec!["search api.github.com octocat^forge"]);
    }

    #[test]
    fn test_explicit_username_wins() {
        let store = MemoryStore::default().with(HOST, "hubot^hubrest", "h");
        let auth = Authenticator::new(&store, &Nobody, &NoCredentialProvider, "hubrest");
        let header = auth.authorization(HOST, &Auth::Default, Some("hubot")).unwrap();
        assert_eq!(header.as_deref(), Some("token h"));
    }

    #[test]
    fn test_missing_token_forgets_then_asks_provider() {
        let store = MemoryStore::default();
        let auth = Authenticator::new(&store, &Fixed("octocat"), &Creates, "hubrest");
        let header = auth.authorization(HOST, &Auth::Default, None).unwrap();
        assert_eq!(header.as_deref(), Some("token new-octocat-hubrest"));
        assert_eq!(
            store.calls(),
            vec![
                "search api.github.com octocat^hubrest",
                "forget api.github.com octocat^hubrest",
            ]
        );
    }

    #[test]
    fn test_missing_token_without_provider() {
        let store = MemoryStore::default();
        let auth = Authenticator::new(&store, &Fixed("octocat"), &NoCredentialProvider, "hubrest");
        let err = auth.authorization(HOST, &Auth::Default, None).unwrap_err();
        match err {
            Error::MissingCredential { host, user } => {
                assert_eq!(host, HOST);
                assert_eq!(user, "octocat^hubrest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_basic_auth() {
        let store = MemoryStore::default().with(HOST, "user", "pass123");
        let auth = Authenticator::new(&store, &Fixed("user"), &NoCredentialProvider, "hubrest");
        let header = auth.authorization(HOST, &Auth::Basic, None).unwrap();
        assert_eq!(header.as_deref(), Some("Basic dXNlcjpwYXNzMTIz"));
    }

    #[test]
    fn test_basic_auth_falls_back_to_provider() {
        let store = MemoryStore::default();
        let auth = Authenticator::new(&store, &Fixed("user"), &Creates, "hubrest");
        let header = auth.authorization(HOST, &Auth::Basic, None).unwrap();
        assert_eq!(header, Some(basic_auth("user", "prompted")));
        assert_eq!(store.calls()[1], "forget api.github.com user");
    }

    #[test]
    fn test_no_auth() {
        let store = MemoryStore::default();
        let auth = Authenticator::new(&store, &Nobody, &NoCredentialProvider, "hubrest");
        assert_eq!(auth.authorization(HOST, &Auth::None, None).unwrap(), None);
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_missing_username() {
        let store = MemoryStore::default();
        let auth = Authenticator::new(&store, &Nobody, &NoCredentialProvider, "hubrest");
        assert!(matches!(
            auth.authorization(HOST, &Auth::Basic, None),
            Err(Error::MissingUsername(_))
        ));
    }
}
