//
//  hubrest
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Utilities
//!
//! Hosts are stored and compared in a normalised form: no scheme, no
//! trailing slash, lower-case host name. A host may carry a path prefix, as API
//! gateways of self-hosted instances usually do (`git.example.com/api/v3`).
//!
//! ```rust
//! use hubrest::config::{base_url, normalize_host};
//!
//! assert_eq!(normalize_host("https://API.GitHub.com/"), "api.github.com");
//! assert_eq!(base_url("git.example.com/api/v3"), "https://git.example.com/api/v3");
//! ```

/// The host used when neither the request nor the configuration names one.
pub const DEFAULT_HOST: &str = "api.github.com";

/// Strips scheme and trailing slashes and lower-cases the host name.
///
/// A path prefix keeps its case, since paths may be case-sensitive.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = strip_scheme(host, "https://")
        .or_else(|| strip_scheme(host, "http://"))
        .unwrap_or(host)
        .trim_end_matches('/');

    match host.split_once('/') {
        Some((authority, path)) => format!("{}/{}", authority.to_lowercase(), path),
        None => host.to_lowercase(),
    }
}

fn strip_scheme<'a>(host: &'a str, scheme: &str) -> Option<&'a str> {
    let prefix = host.get(..scheme.len())?;
    prefix
        .eq_ignore_ascii_case(scheme)
        .then(|| &host[scheme.len()..])
}

/// The HTTPS base URL of a host, without trailing slash.
pub fn base_url(host: &str) -> String {
    format!("https://{}", normalize_host(host))
}
