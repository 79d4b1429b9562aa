//
//  hubrest
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Values and Encoding
//!
//! A [`Request`] is a plain, immutable description of one API call. It is
//! built by the caller (usually through [`RequestBuilder`](crate::api::RequestBuilder)),
//! handed to the dispatcher by value and never consulted through global state.
//!
//! This module also holds the parameter and body encoders:
//!
//! - [`Params::encode`] turns the ordered parameter mapping into a query string
//! - [`encode_body`] turns an optional JSON value into request bytes
//!
//! Both encoders are deterministic, which pagination depends on: every
//! follow-up page re-encodes the same parameters with only `page` replaced.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use url::form_urlencoded;

use crate::api::common::{Error, Result};
use crate::api::response::Decoder;
use crate::auth::Auth;

/// The query parameter owned by the pagination engine.
pub const PAGE_PARAM: &str = "page";

/// HTTP methods supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Head,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// The upper-case method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::InvalidArgument(format!("Unsupported HTTP method: {}", s))),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Ordered query parameters with unique keys.
///
/// Setting a key that is already present replaces its value in place, so the
/// encoded order always follows first insertion.
///
/// # Example
///
/// ```rust
/// use hubrest::api::Params;
///
/// let mut params = Params::new();
/// params.set("state", "open");
/// params.set("per_page", 100);
/// params.set("state", "all");
/// assert_eq!(params.encode().as_deref(), Some("state=all&per_page=100"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Returns the value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` when `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    /// Returns `true` when no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters as `key=value&...`.
    ///
    /// Keys and values are percent-encoded with the
    /// `application/x-www-form-urlencoded` rules. An empty set yields `None`
    /// so that no `?` is appended to the URL.
    pub fn encode(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.0 {
            serializer.append_pair(key, value);
        }
        Some(serializer.finish())
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Encodes a request body as UTF-8 JSON.
///
/// An absent body produces no payload at all, not the JSON text `null`.
pub fn encode_body(body: Option<&Value>) -> Result<Option<Vec<u8>>> {
    body.map(serde_json::to_vec).transpose().map_err(Error::from)
}

/// One API call, fully described.
///
/// All fields are public so that a request can be built directly; the
/// builder on [`Client`](crate::Client) is the usual way in.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Resource path, must start with `/`.
    pub path: String,
    /// Query parameters.
    pub params: Params,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Extra headers, sent after `Content-Type` and `Authorization`.
    pub headers: Vec<(String, String)>,
    /// Follow `rel="next"` links and merge every page.
    pub paginate: bool,
    /// Return failures as plain responses instead of errors.
    pub suppress_errors: bool,
    /// How the response body is decoded.
    pub decoder: Decoder,
    /// Explicit username for credential lookup.
    pub username: Option<String>,
    /// Credential specifier.
    pub auth: Auth,
    /// Target host; the client's default host when `None`.
    pub host: Option<String>,
}

impl Request {
    /// Creates a request with default settings.
    ///
    /// # Parameters
    ///
    /// * `method` - The HTTP method
    /// * `path` - Resource path, beginning with `/`
    ///
    /// # Returns
    ///
    /// A request with no parameters or body, [`Auth::Default`](crate::Auth::Default),
    /// the JSON decoder, no pagination and errors raised.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: None,
            headers: Vec::new(),
            paginate: false,
            suppress_errors: false,
            decoder: Decoder::default(),
            username: None,
            auth: Auth::default(),
            host: None,
        }
    }

    /// Checks the invariants the dispatcher relies on.
    ///
    /// The path must be absolute and, when pagination is requested, the
    /// `page` parameter must be left to the pagination engine.
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(Error::InvalidArgument(format!(
                "Resource path must start with '/': {}",
                self.path
            )));
        }
        if self.paginate && self.params.contains(PAGE_PARAM) {
            return Err(Error::InvalidArgument(format!(
                "'{}' is reserved when pagination is requested",
                PAGE_PARAM
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_empty_params_encode_to_nothing() {
        assert_eq!(Params::new().encode(), None);
    }

    #[test]
    fn test_encode_round_trips_through_query_parser() {
        let params: Params = [
            ("q", "is:open label:\"good first issue\""),
            ("sort", "updated"),
            ("a&b", "c=d"),
            ("unicode", "héllo wörld"),
        ]
        .into_iter()
        .collect();

        let encoded = params.encode().unwrap();
        let decoded: HashSet<(String, String)> = form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        let original: HashSet<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let mut a = Params::new();
        a.set("per_page", 100);
        a.set("state", "closed");
        let b = a.clone();
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.encode().as_deref(), Some("per_page=100&state=closed"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = Params::new();
        params.set("a", 1);
        params.set("b", 2);
        params.set("a", 3);
        assert_eq!(params.len(), 2);
        assert_eq!(params.encode().as_deref(), Some("a=3&b=2"));
        assert_eq!(params.remove("a").as_deref(), Some("3"));
        assert_eq!(params.remove("a"), None);
    }

    #[test]
    fn test_encode_body() {
        assert_eq!(encode_body(None).unwrap(), None);
        let body = json!({"title": "Bug", "labels": ["x"]});
        let bytes = encode_body(Some(&body)).unwrap().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"title":"Bug","labels":["x"]}"#
        );
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert!(matches!(
            "OPTIONS".parse::<Method>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(Request::new(Method::Get, "/user").validate().is_ok());
        assert!(matches!(
            Request::new(Method::Get, "user").validate(),
            Err(Error::InvalidArgument(_))
        ));

        let mut paged = Request::new(Method::Get, "/user/repos");
        paged.paginate = true;
        paged.params.set("page", 2);
        assert!(matches!(paged.validate(), Err(Error::InvalidArgument(_))));

        paged.paginate = false;
        assert!(paged.validate().is_ok());
    }
}
