//
//  hubrest
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # hubrest
//!
//! A small client for authenticated JSON REST APIs that paginate with
//! `Link` headers, such as GitHub's.
//!
//! ## Features
//!
//! - **One entry point**: [`Client::request`] plus one builder per HTTP method
//! - **Credentials**: literal tokens, tokens stored per identity in the system
//!   keyring, or Basic authentication
//! - **Pagination**: `rel="next"` links followed page by page, bodies merged
//! - **Typed errors**: 301/400/401/403/404/422 classified, with the request
//!   context kept for diagnosis; optional per-request suppression
//! - **Polling**: [`Client::wait`] with exponential backoff
//!
//! ## Module Structure
//!
//! - [`api`]: request engine (client, encoding, parsing, transports, errors)
//! - [`auth`]: credential specifiers, stores and header resolution
//! - [`config`]: configuration file management
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hubrest::Client;
//!
//! # async fn example() -> hubrest::Result<()> {
//! let client = Client::new()?;
//! let issues = client
//!     .get("/repos/octocat/hello-world/issues")
//!     .param("state", "open")
//!     .paginate()
//!     .send()
//!     .await?;
//! println!("{} open issues", issues.body.map_or(0, |b| b.as_array().map_or(0, Vec::len)));
//! # Ok(())
//! # }
//! ```

pub mod api;

pub mod auth;

pub mod config;

pub use api::{Client, Error, HttpError, HttpErrorKind, Method, Params, Request, Response, Result};

pub use auth::Auth;

pub use config::Config;

pub const APP_NAME: &str = "hubrest";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Installs a `tracing` subscriber for applications embedding the library.
///
/// The filter is read from `HUBREST_DEBUG` (for example `hubrest=debug`)
/// and defaults to `warn`. Calling it twice is harmless.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("HUBREST_DEBUG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
