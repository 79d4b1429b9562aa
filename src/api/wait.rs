//
//  hubrest
//  api/wait.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Availability Poller
//!
//! Some resources appear a little after the call that creates them (a fork,
//! a freshly pushed branch). [`Client::wait`] polls such a resource with a
//! suppressed GET until it answers with a 2xx status.
//!
//! | Attempt fails | Next delay | Total waited |
//! |---------------|------------|--------------|
//! | 1 | 1s | 1s |
//! | 2 | 2s | 3s |
//! | ... | ... | ... |
//! | 7 | 64s | 127s |
//! | 8 | 128s, gives up | 127s |
//!
//! The waits are `tokio` sleeps: dropping the returned future (for example
//! from a `tokio::select!` or a timeout) cancels the poll mid-wait.

use std::time::Duration;

use crate::api::client::Client;
use crate::api::common::{Error, Result};
use crate::api::request::{Method, Request};
use crate::api::response::Response;

/// Delay before doubling for the first retry.
pub const INITIAL_DELAY: Duration = Duration::from_millis(500);

/// A retry delay reaching this value ends the poll.
pub const MAX_DELAY: Duration = Duration::from_secs(128);

impl Client {
    /// Polls `path` on the default host until it is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PollTimeout`] with the total time waited once the
    /// next delay would reach [`MAX_DELAY`]. Credential and network errors
    /// end the poll immediately.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example(client: hubrest::Client) -> hubrest::Result<()> {
    /// client.post("/repos/octocat/hello-world/forks").send().await?;
    /// client.wait("/repos/me/hello-world").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait(&self, path: &str) -> Result<Response> {
        self.wait_with(Request::new(Method::Get, path)).await
    }

    /// Polls with a prepared request, for other hosts or credentials.
    ///
    /// The request is always sent as a GET with errors suppressed.
    pub async fn wait_with(&self, mut request: Request) -> Result<Response> {
        request.method = Method::Get;
        request.suppress_errors = true;

        let mut delay = INITIAL_DELAY;
        let mut total = Duration::ZERO;
        loop {
            let response = self.request(request.clone()).await?;
            if response.is_success() {
                return Ok(response);
            }

            delay *= 2;
            if delay >= MAX_DELAY {
                return Err(Error::PollTimeout {
                    path: request.path,
                    waited: total,
                });
            }

            tracing::info!(
                "Waiting for {} ({}s)...",
                request.path,
                total.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            total += delay;
        }
    }
}
