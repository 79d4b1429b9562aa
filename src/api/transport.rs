//
//  hubrest
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Transports
//!
//! The dispatcher never talks to the network directly. It hands a fully
//! prepared request to a [`Transport`] and gets back a [`RawResponse`] whose
//! body has been read to the end.
//!
//! - [`ReqwestTransport`] performs real HTTPS calls with `reqwest`.
//! - [`ReplayTransport`] serves canned HTTP messages in order and records
//!   every request it receives. It is useful for exercising code built on
//!   this crate without a server.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::api::common::{Error, Result};
use crate::api::request::Method;
use crate::api::response::RawResponse;

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    /// Headers in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Encoded body, `None` for no payload.
    pub body: Option<Vec<u8>>,
}

impl PreparedRequest {
    /// Returns the first header with the given name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value of a query parameter in the URL.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Something that can execute a [`PreparedRequest`].
///
/// Implementations must return only once the whole response body has been
/// received, and must release any response buffer before returning, on
/// success and on error alike.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &PreparedRequest) -> Result<RawResponse>;
}

/// HTTPS transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given overall request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("hubrest/{}", crate::VERSION))
                .timeout(timeout)
                .build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &PreparedRequest) -> Result<RawResponse> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        // obs-text bytes are legal in header values; keep them, lossily.
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        // Consumes the response; its buffer is gone once this returns.
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Replays canned HTTP/1.1 messages in FIFO order.
///
/// # Example
///
/// ```rust
/// use hubrest::api::ReplayTransport;
///
/// let replay = ReplayTransport::new();
/// replay.respond(200, &[("Content-Type", "application/json")], r#"{"login":"octocat"}"#);
/// assert_eq!(replay.remaining(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ReplayTransport {
    responses: Mutex<VecDeque<Vec<u8>>>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl ReplayTransport {
    /// Creates a transport with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw HTTP message, status line and headers included.
    pub fn push(&self, message: impl Into<Vec<u8>>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message.into());
        self
    }

    /// Queues a response built from its parts.
    pub fn respond(&self, status: u16, headers: &[(&str, &str)], body: &str) -> &Self {
        let mut message = format!("HTTP/1.1 {}\r\n", status);
        for (name, value) in headers {
            message.push_str(&format!("{}: {}\r\n", name, value));
        }
        message.push_str("\r\n");
        message.push_str(body);
        self.push(message)
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of queued responses not yet served.
    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn execute(&self, request: &PreparedRequest) -> Result<RawResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let message = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| {
                Error::Transport(format!(
                    "no recorded response left for {} {}",
                    request.method, request.url
                ))
            })?;

        RawResponse::parse(&message)
    }
}
