//
//  hubrest
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads and saves the library's TOML configuration and answers the
//! default-username question for the authentication resolver.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/hubrest/config.toml`
//! - **macOS**: `~/Library/Application Support/hubrest/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\hubrest\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! default_host = "api.github.com"
//! package = "hubrest"
//! timeout_secs = 30
//!
//! [hosts."api.github.com"]
//! user = "octocat"
//!
//! [hosts."git.example.com/api/v3"]
//! user = "jdoe"
//! ```
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `HUBREST_HOST` | Overrides `core.default_host` |
//! | `HUBREST_USER` | Username for hosts without a configured `user` |
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`hosts`]: Host constants and normalisation

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::common::Error;
use crate::auth::UsernameResolver;

/// Environment variable overriding the default host.
pub const HOST_ENV: &str = "HUBREST_HOST";

/// Environment variable supplying a fallback username.
pub const USER_ENV: &str = "HUBREST_USER";

/// Global configuration container.
///
/// # Examples
///
/// ```rust
/// use hubrest::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.core.default_host, "api.github.com");
/// assert_eq!(config.core.package, "hubrest");
/// ```
///
/// # Notes
///
/// - All fields use `#[serde(default)]` so partial files load cleanly
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Settings that apply to every host.
    #[serde(default)]
    pub core: CoreConfig,

    /// Per-host settings keyed by normalised host.
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

/// Settings that apply to every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Host used when a request names none.
    #[serde(default = "default_host")]
    pub default_host: String,

    /// Requesting package name; also the default token identity.
    #[serde(default = "default_package")]
    pub package: String,

    /// Overall timeout of a single HTTP call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_package() -> String {
    crate::APP_NAME.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_host: default_host(),
            package: default_package(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Per-host settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    /// Username to authenticate as on this host.
    #[serde(default)]
    pub user: Option<String>,
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the defaults. `HUBREST_HOST` is applied on top.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(host) = std::env::var(HOST_ENV) {
            if !host.trim().is_empty() {
                config.core.default_host = normalize_host(&host);
            }
        }
        Ok(config)
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if config_exists(path) {
            let content = read_config_file(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the path of the configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the platform has no configuration directory for the user.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Settings for `host`, looked up by its normalised form.
    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// Records the username for a host.
    pub fn set_user(&mut self, host: &str, user: impl Into<String>) {
        self.hosts.entry(normalize_host(host)).or_default().user = Some(user.into());
    }

    /// The per-call HTTP timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.core.timeout_secs)
    }
}

impl UsernameResolver for Config {
    fn resolve(&self, host: &str) -> crate::Result<String> {
        if let Some(user) = self.host_config(host).and_then(|h| h.user.clone()) {
            return Ok(user);
        }
        match std::env::var(USER_ENV) {
            Ok(user) if !user.trim().is_empty() => Ok(user.trim().to_string()),
            _ => Err(Error::MissingUsername(normalize_host(host))),
        }
    }
}
