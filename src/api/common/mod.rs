//
//  hubrest
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types: Errors and Status Classification
//!
//! This module provides the error taxonomy shared by every part of the
//! request engine, together with the classifier that maps non-2xx status
//! codes onto typed HTTP errors.
//!
//! # Overview
//!
//! - [`Error`] - Unified error type for all library operations
//! - [`HttpError`] - A classified HTTP failure carrying its request context
//! - [`HttpErrorKind`] - The specific kind of HTTP failure
//! - [`RequestContext`] - Method, path, params, body and response body of the failed call
//! - [`classify`] - Status code to [`HttpError`] mapping
//! - Pagination helpers (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use hubrest::api::common::{Error, HttpErrorKind};
//!
//! fn describe(result: Result<(), Error>) -> &'static str {
//!     match result {
//!         Ok(()) => "ok",
//!         Err(Error::Http(e)) if e.kind() == HttpErrorKind::NotFound => "missing",
//!         Err(_) => "failed",
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::api::request::Method;

mod pagination;

pub use pagination::*;

/// Unified error type for all hubrest operations.
///
/// | Variant | Description |
/// |---------|-------------|
/// | `Http` | The server answered with a non-2xx status |
/// | `TransportInvariant` | The response had no readable header block |
/// | `PollTimeout` | [`Client::wait`](crate::Client::wait) gave up |
/// | `NotAList` | A paginated page body was not a JSON array |
/// | `InvalidArgument` | The caller built an unusable request or specifier |
/// | `MissingCredential` | No secret could be found or created |
/// | `MissingUsername` | No username is configured for a host |
/// | `Network` | Connection, TLS or timeout failure from reqwest |
///
/// # Notes
///
/// - `TransportInvariant` is never retried; it signals a broken transport.
/// - HTTP errors are only produced when error suppression is off.
#[derive(Error, Debug)]
pub enum Error {
    /// A classified HTTP failure.
    #[error(transparent)]
    Http(Box<HttpError>),

    /// The transport returned a response without a well-formed header block.
    #[error("Malformed response from transport: {0}")]
    TransportInvariant(String),

    /// The availability poller ran out of patience.
    #[error("Timed out waiting for {path} after {:.1}s", waited.as_secs_f64())]
    PollTimeout {
        /// The resource path that never became available
        path: String,
        /// Total time spent sleeping between attempts
        waited: Duration,
    },

    /// A page of a paginated listing did not decode to a JSON array.
    #[error("Paginated response body is not a list")]
    NotAList,

    /// The request or credential specifier is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No secret is stored for this identity and none could be created.
    #[error("No credential for {user} on {host}")]
    MissingCredential {
        /// Host the credential was requested for
        host: String,
        /// Store key the credential was looked up under
        user: String,
    },

    /// No username could be determined for the host.
    #[error("No username configured for {0}")]
    MissingUsername(String),

    /// A network-level error occurred during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A non-reqwest transport failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Host and path do not form a valid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The system keyring rejected an operation.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Self::Http(Box::new(err))
    }
}

/// Library-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The specific kind of a classified HTTP failure.
///
/// | Kind | Status |
/// |------|--------|
/// | `Moved` | 301 |
/// | `BadRequest` | 400 |
/// | `Unauthorized` | 401 |
/// | `Forbidden` | 403 |
/// | `NotFound` | 404 |
/// | `Unprocessable` | 422 |
/// | `Other` | any other non-2xx |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    Moved,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Unprocessable,
    Other,
}

impl HttpErrorKind {
    /// Maps a status code onto its error kind.
    ///
    /// Success codes are not special-cased here; callers decide whether a
    /// status is a failure before asking for its kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            301 => Self::Moved,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::Unprocessable,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Moved => "Moved permanently",
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::Unprocessable => "Unprocessable entity",
            Self::Other => "HTTP error",
        };
        f.write_str(name)
    }
}

/// The request that produced a classified failure.
///
/// Holds the encoded query string and body exactly as they were sent, plus
/// the decoded response body, so an error can be diagnosed without
/// re-issuing the call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// HTTP method of the failed call.
    pub method: Method,
    /// Resource path, without host or query string.
    pub path: String,
    /// Encoded query string, if any parameters were sent.
    pub params: Option<String>,
    /// Encoded JSON body, if one was sent.
    pub body: Option<String>,
    /// Decoded response body (`None` when absent).
    pub response: Option<Value>,
}

/// A non-2xx response classified into an [`HttpErrorKind`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} ({status}): {} {}", context.method, context.path)]
pub struct HttpError {
    kind: HttpErrorKind,
    status: u16,
    context: RequestContext,
}

impl HttpError {
    /// Classifies `status` and attaches the request context.
    pub fn new(status: u16, context: RequestContext) -> Self {
        Self {
            kind: HttpErrorKind::from_status(status),
            status,
            context,
        }
    }

    /// The kind derived from the status.
    pub fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    /// The numeric status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The failed request and the decoded response body.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Extracts a human readable message from the response body.
    ///
    /// REST APIs of this family answer errors with `{"message": "..."}`;
    /// the first `errors[].message` is used as a fallback.
    pub fn message(&self) -> Option<&str> {
        let body = self.context.response.as_ref()?;
        body.get("message").and_then(Value::as_str).or_else(|| {
            body.get("errors")
                .and_then(Value::as_array)
                .and_then(|arr| arr.first())
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
    }
}

/// Returns `true` for statuses in the 200-299 range.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Classifies a response status.
///
/// Returns `None` for 2xx statuses and an [`HttpError`] carrying `context`
/// for everything else. The context is only built when it is needed.
pub fn classify<F>(status: u16, context: F) -> Option<HttpError>
where
    F: FnOnce() -> RequestContext,
{
    if is_success(status) {
        None
    } else {
        Some(HttpError::new(status, context()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> RequestContext {
        RequestContext {
            method: Method::Get,
            path: "/repos/o/r".to_string(),
            params: Some("per_page=100".to_string()),
            body: None,
            response: Some(json!({"message": "Not Found"})),
        }
    }

    #[test]
    fn test_specific_kinds() {
        let cases = [
            (301, HttpErrorKind::Moved),
            (400, HttpErrorKind::BadRequest),
            (401, HttpErrorKind::Unauthorized),
            (403, HttpErrorKind::Forbidden),
            (404, HttpErrorKind::NotFound),
            (422, HttpErrorKind::Unprocessable),
        ];
        for (status, kind) in cases {
            let err = classify(status, context).expect("non-2xx must classify");
            assert_eq!(err.kind(), kind);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_other_statuses_keep_code() {
        for status in [100, 302, 304, 402, 405, 409, 429, 500, 502, 503] {
            let err = classify(status, context).unwrap();
            assert_eq!(err.kind(), HttpErrorKind::Other);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_success_does_not_classify() {
        for status in [200, 201, 204, 299] {
            assert!(classify(status, || unreachable!()).is_none());
        }
    }

    #[test]
    fn test_error_carries_context() {
        let err = classify(404, context).unwrap();
        assert_eq!(err.context().path, "/repos/o/r");
        assert_eq!(err.context().params.as_deref(), Some("per_page=100"));
        assert_eq!(err.message(), Some("Not Found"));
        assert_eq!(err.to_string(), "Not found (404): GET /repos/o/r");
    }

    #[test]
    fn test_message_from_errors_array() {
        let mut ctx = context();
        ctx.response = Some(json!({"errors": [{"message": "name is taken"}]}));
        let err = HttpError::new(422, ctx);
        assert_eq!(err.message(), Some("name is taken"));
    }
}
