//
//  hubrest
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Helpers for Link-Header Listings
//!
//! List endpoints answer with one page of results and a `Link` header whose
//! `rel="next"` entry points at the following page:
//!
//! ```text
//! GET /user/repos?per_page=2          -> [1, 2]   Link: <...&page=2>; rel="next"
//! GET /user/repos?per_page=2&page=2   -> [3, 4]   Link: <...&page=3>; rel="next"
//! GET /user/repos?per_page=2&page=3   -> []       (no next link)
//! ```
//!
//! The dispatcher drives the loop; this module supplies the two pieces it
//! needs:
//!
//! - [`continuation_params`] builds the parameters of the next page request
//! - [`Pages`] accumulates page bodies in order
//!
//! # Notes
//!
//! - Pagination only makes sense for endpoints returning JSON arrays; any
//!   other page body is rejected with [`Error::NotAList`].
//! - An absent page body (empty response) counts as an empty page.
//! - A failed page whose error was suppressed never discards the pages
//!   before it; see [`Pages::push_failed`].

use serde_json::Value;

use super::{Error, Result};
use crate::api::request::{Params, PAGE_PARAM};

/// Returns `params` with `page` set to the continuation token.
///
/// Every other parameter keeps its value and position.
pub fn continuation_params(params: &Params, token: &str) -> Params {
    let mut next = params.clone();
    next.set(PAGE_PARAM, token);
    next
}

/// Ordered accumulator of page items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pages {
    items: Vec<Value>,
    pages: usize,
}

impl Pages {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the items of one page.
    pub fn push(&mut self, body: Option<Value>) -> Result<()> {
        match body {
            None => {}
            Some(Value::Array(items)) => self.items.extend(items),
            Some(_) => return Err(Error::NotAList),
        }
        self.pages += 1;
        Ok(())
    }

    /// Appends the items of a failed page whose error was suppressed.
    ///
    /// Error bodies are usually objects such as `{"message": "Not Found"}`;
    /// anything that is not a list counts as an empty page.
    pub fn push_failed(&mut self, body: Option<Value>) {
        if let Some(Value::Array(items)) = body {
            self.items.extend(items);
        }
        self.pages += 1;
    }

    /// Number of pages pushed so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Number of items collected across all pages.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no page contributed an item.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The merged listing as a JSON array.
    pub fn into_value(self) -> Value {
        Value::Array(self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_continuation_replaces_only_page() {
        let mut params = Params::new();
        params.set("per_page", 2);
        params.set("sort", "updated");

        let next = continuation_params(&params, "2");
        assert_eq!(next.encode().as_deref(), Some("per_page=2&sort=updated&page=2"));

        let after = continuation_params(&next, "3");
        assert_eq!(after.encode().as_deref(), Some("per_page=2&sort=updated&page=3"));
        assert!(!params.contains("page"));
    }

    #[test]
    fn test_pages_preserve_order() {
        let mut pages = Pages::new();
        pages.push(Some(json!([1, 2]))).unwrap();
        pages.push(Some(json!([3, 4]))).unwrap();
        pages.push(Some(json!([]))).unwrap();
        pages.push(None).unwrap();
        assert_eq!(pages.page_count(), 4);
        assert_eq!(pages.len(), 4);
        assert_eq!(pages.into_value(), json!([1, 2, 3, 4]));
    }

    #[test]
    fn test_failed_page_keeps_earlier_items() {
        let mut pages = Pages::new();
        pages.push(Some(json!([1, 2]))).unwrap();
        pages.push_failed(Some(json!({"message": "Not Found"})));
        pages.push_failed(None);
        pages.push_failed(Some(json!([3])));
        assert_eq!(pages.page_count(), 4);
        assert_eq!(pages.into_value(), json!([1, 2, 3]));
    }

    #[test]
    fn test_non_list_page_is_rejected() {
        let mut pages = Pages::new();
        assert!(matches!(
            pages.push(Some(json!({"total_count": 3}))),
            Err(Error::NotAList)
        ));
        assert!(pages.is_empty());
    }
}
