//
//  hubrest
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Engine
//!
//! ## Module Structure
//!
//! - [`client`]: [`Client`], the request dispatcher and its builders
//! - [`request`]: [`Request`] values and the parameter/body encoders
//! - [`response`]: raw and decoded responses, `Link` parsing, decoders
//! - [`transport`]: the network seam ([`ReqwestTransport`], [`ReplayTransport`])
//! - [`common`]: errors, status classification and pagination helpers
//! - [`wait`]: the availability poller ([`Client::wait`])

pub mod client;
pub mod common;
pub mod request;
pub mod response;
pub mod transport;
pub mod wait;

pub use client::{build_url, Client, RequestBuilder};
pub use common::{Error, HttpError, HttpErrorKind, RequestContext, Result};
pub use request::{encode_body, Method, Params, Request, PAGE_PARAM};
pub use response::{Decoder, RawResponse, Response};
pub use transport::{PreparedRequest, ReplayTransport, ReqwestTransport, Transport};
