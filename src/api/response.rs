//
//  hubrest
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response Parsing
//!
//! Turns what the transport hands back into a [`Response`]:
//!
//! 1. [`RawResponse`] holds the status, the header block as ordered
//!    `Name: Value` pairs and the undecoded body bytes.
//! 2. [`parse_response`] decodes the body with the request's [`Decoder`]
//!    and extracts the `Link` header and its `rel="next"` page token.
//!
//! ## Decoding
//!
//! The default [`Decoder::Json`] reads the body as UTF-8 JSON. Objects keep
//! their key order, an empty body is "absent" (`None`) and both `null` and
//! `false` are normalised to absent as well, so callers only ever test for
//! `None`.
//!
//! ## Link Header
//!
//! ```text
//! Link: <https://api.github.com/user/repos?page=2>; rel="next",
//!       <https://api.github.com/user/repos?page=5>; rel="last"
//! ```
//!
//! The `page` query value of the `next` entry is the continuation token.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::api::common::{is_success, Error, Result};
use crate::api::request::PAGE_PARAM;

static STATUS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HTTP/\d(?:\.\d)?\s+(\d{3})").expect("valid regex"));

static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:\s]+):[ \t]*(.*?)[ \t]*$").expect("valid regex"));

static LINK_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<([^>]*)>\s*;\s*rel="([^"]*)""#).expect("valid regex"));

/// Resolves relative `Link` targets; only their query is read.
static LINK_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("https://localhost/").expect("valid url"));

/// Signature of a custom body decoder.
pub type DecodeFn = dyn Fn(&[u8]) -> Result<Option<Value>> + Send + Sync;

/// How a response body is turned into a value.
#[derive(Clone, Default)]
pub enum Decoder {
    /// UTF-8 JSON with `null`/`false` normalised to absent.
    #[default]
    Json,
    /// The body as a JSON string, absent when empty.
    Text,
    /// A caller supplied decoder.
    Custom(Arc<DecodeFn>),
}

impl Decoder {
    /// Wraps a function as a decoder.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Decodes a body. An empty body decodes to `None` for every built-in
    /// decoder.
    pub fn decode(&self, body: &[u8]) -> Result<Option<Value>> {
        match self {
            Self::Json => decode_json(body),
            Self::Text => {
                if body.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Value::String(String::from_utf8_lossy(body).into_owned())))
                }
            }
            Self::Custom(f) => f(body),
        }
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("Json"),
            Self::Text => f.write_str("Text"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Decodes a JSON body.
///
/// Whitespace-only bodies are absent rather than a parse error.
pub fn decode_json(body: &[u8]) -> Result<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(body)?;
    Ok(normalize(value))
}

fn normalize(value: Value) -> Option<Value> {
    match value {
        Value::Null | Value::Bool(false) => None,
        other => Some(strip_false(other)),
    }
}

fn strip_false(value: Value) -> Value {
    match value {
        Value::Bool(false) => Value::Null,
        Value::Array(items) => Value::Array(items.into_iter().map(strip_false).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, strip_false(v))).collect())
        }
        other => other,
    }
}

/// A response as delivered by a transport, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Numeric status code.
    pub status: u16,
    /// Headers in receipt order; duplicates are kept.
    pub headers: Vec<(String, String)>,
    /// Body bytes following the header block.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Parses a complete HTTP/1.x response message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransportInvariant`] when the message has no blank
    /// line ending the header block or when the status line is unreadable.
    /// Header bytes outside ASCII are legal and are read lossily as UTF-8.
    pub fn parse(message: &[u8]) -> Result<Self> {
        let (head, body) = split_head(message).ok_or_else(|| {
            Error::TransportInvariant("response has no end-of-headers marker".to_string())
        })?;
        let head = String::from_utf8_lossy(head);

        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|line| STATUS_LINE.captures(line))
            .and_then(|caps| caps[1].parse::<u16>().ok())
            .ok_or_else(|| Error::TransportInvariant("unreadable status line".to_string()))?;

        Ok(Self {
            status,
            headers: parse_header_lines(lines),
            body: body.to_vec(),
        })
    }
}

fn split_head(message: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(pos) = find(message, b"\r\n\r\n") {
        return Some((&message[..pos], &message[pos + 4..]));
    }
    find(message, b"\n\n").map(|pos| (&message[..pos], &message[pos + 2..]))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Scans `Name: Value` lines, keeping order and duplicates.
///
/// Lines that do not match the pattern are skipped.
pub fn parse_header_lines<'a, I>(lines: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| HEADER_LINE.captures(line.trim_end_matches('\r')))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Splits a `Link` header into `(relation, url)` pairs.
///
/// An entry with several space separated relations yields one pair per
/// relation.
pub fn parse_link_header(value: &str) -> Vec<(String, String)> {
    let mut relations = Vec::new();
    for caps in LINK_ENTRY.captures_iter(value) {
        for rel in caps[2].split_whitespace() {
            relations.push((rel.to_string(), caps[1].to_string()));
        }
    }
    relations
}

/// Extracts the continuation token from a `Link` header.
///
/// Returns the `page` query value of the `rel="next"` URL, or `None` when
/// there is no next link or it carries no page.
pub fn next_page_token(link: &str) -> Option<String> {
    parse_link_header(link)
        .into_iter()
        .filter(|(rel, _)| rel == "next")
        .find_map(|(_, url)| {
            Url::options()
                .base_url(Some(&LINK_BASE))
                .parse(&url)
                .ok()
                .and_then(|url| {
                    url.query_pairs()
                        .find(|(key, _)| key == PAGE_PARAM)
                        .map(|(_, value)| value.into_owned())
                })
        })
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Numeric status code.
    pub status: u16,
    /// Headers in receipt order.
    pub headers: Vec<(String, String)>,
    /// Decoded body, `None` when absent.
    pub body: Option<Value>,
    /// Raw `Link` header value.
    pub link: Option<String>,
    /// Page token of the `rel="next"` link.
    pub next_page: Option<String>,
}

impl Response {
    /// Returns the first header with the given name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All relations advertised by the `Link` header.
    pub fn link_relations(&self) -> Vec<(String, String)> {
        self.link.as_deref().map(parse_link_header).unwrap_or_default()
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }

    /// Consumes the response, keeping only the body.
    pub fn into_body(self) -> Option<Value> {
        self.body
    }
}

/// Decodes a raw response with the given decoder.
///
/// A failure status whose body does not decode is treated as absent rather
/// than masking the status with a decode error.
pub fn parse_response(raw: RawResponse, decoder: &Decoder) -> Result<Response> {
    let body = match decoder.decode(&raw.body) {
        Ok(body) => body,
        Err(_) if !is_success(raw.status) => None,
        Err(e) => return Err(e),
    };

    let link = raw
        .headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("link"))
        .map(|(_, v)| v.clone());
    let next_page = link.as_deref().and_then(next_page_token);

    Ok(Response {
        status: raw.status,
        headers: raw.headers,
        body,
        link,
        next_page,
    })
}
