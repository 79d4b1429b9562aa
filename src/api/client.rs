//
//  hubrest
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Dispatcher
//!
//! [`Client`] is the single entry point for API calls. For every call it:
//!
//! 1. validates the [`Request`] and picks the host
//! 2. resolves the `Authorization` header once
//! 3. encodes parameters and body and sends the request through its
//!    [`Transport`], waiting for the complete response
//! 4. decodes the response and classifies failures
//! 5. when pagination is requested, follows `rel="next"` links page by page
//!    and merges the bodies
//!
//! ## Features
//!
//! - One generic [`Client::request`] plus `get`/`put`/`head`/`post`/`patch`/`delete`
//!   builders
//! - Pluggable transport, credential store, username resolver and
//!   credential provider
//! - Error suppression per request

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::api::common::{
    classify, continuation_params, is_success, Error, Pages, RequestContext, Result,
};
use crate::api::request::{encode_body, Method, Params, Request};
use crate::api::response::{parse_response, Decoder, Response};
use crate::api::transport::{PreparedRequest, ReqwestTransport, Transport};
use crate::auth::{
    Auth, Authenticator, CredentialProvider, CredentialStore, KeyringStore, NoCredentialProvider,
    UsernameResolver,
};
use crate::config::{base_url, normalize_host, Config};

/// Builds the full URL of a request.
///
/// # Errors
///
/// Returns [`Error::Url`] when host and path do not form a valid URL and
/// [`Error::InvalidArgument`] when the result is not HTTPS.
pub fn build_url(host: &str, path: &str, query: Option<&str>) -> Result<Url> {
    let mut url = format!("{}{}", base_url(host), path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    let url = Url::parse(&url)?;
    if url.scheme() != "https" {
        return Err(Error::InvalidArgument(format!("Not an HTTPS URL: {}", url)));
    }
    Ok(url)
}

/// The API client.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use hubrest::Client;
///
/// // Configuration from the default config file, keyring credentials
/// let client = Client::new()?;
/// # Ok::<(), hubrest::Error>(())
/// ```
///
/// # Making Requests
///
/// ```rust,no_run
/// use hubrest::{Auth, Client};
///
/// # async fn example() -> hubrest::Result<()> {
/// let client = Client::new()?;
///
/// // Every repository of the user, all pages merged
/// let repos = client
///     .get("/user/repos")
///     .param("per_page", 100)
///     .paginate()
///     .send()
///     .await?;
///
/// // A literal token, errors returned as plain responses
/// let response = client
///     .get("/repos/octocat/hello-world")
///     .auth(Auth::Token("ghp_xxx".into()))
///     .suppress_errors()
///     .send()
///     .await?;
/// if response.body.is_none() {
///     println!("not there");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    usernames: Arc<dyn UsernameResolver>,
    provider: Arc<dyn CredentialProvider>,
    /// Normalised host used when a request names none
    default_host: String,
    /// Requesting package, also the default token identity
    package: String,
}

impl Client {
    /// Creates a client from the configuration file.
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::load()?)
    }

    /// Creates a client from a loaded configuration.
    ///
    /// The client talks HTTPS through `reqwest`, reads secrets from the
    /// system keyring, takes usernames from `config` and has no credential
    /// provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(ReqwestTransport::new(config.timeout())?),
            store: Arc::new(KeyringStore::new()),
            usernames: Arc::new(config.clone()),
            provider: Arc::new(NoCredentialProvider),
            default_host: normalize_host(&config.core.default_host),
            package: config.core.package.clone(),
        })
    }

    /// Replaces the transport, for example with a [`ReplayTransport`](crate::api::ReplayTransport).
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replaces the credential store used for token and password lookups.
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = store;
        self
    }

    /// Replaces the source of default usernames.
    pub fn with_username_resolver(mut self, usernames: Arc<dyn UsernameResolver>) -> Self {
        self.usernames = usernames;
        self
    }

    /// Replaces the fallback asked when the store has no secret.
    pub fn with_credential_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Sets the host used by requests that name none.
    ///
    /// The host is normalised; `https://API.GitHub.com/` becomes `api.github.com`.
    pub fn with_default_host(mut self, host: &str) -> Self {
        self.default_host = normalize_host(host);
        self
    }

    /// The normalised default host.
    pub fn default_host(&self) -> &str {
        &self.default_host
    }

    /// The requesting package name, which is also the default token identity.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Starts a request with an explicit method.
    ///
    /// # Parameters
    ///
    /// * `method` - The HTTP method
    /// * `path` - Resource path, beginning with `/`
    ///
    /// # Returns
    ///
    /// A [`RequestBuilder`] with default authentication, no parameters and
    /// errors raised.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use hubrest::{Client, Method};
    ///
    /// # async fn example(client: Client) -> hubrest::Result<()> {
    /// let method: Method = "PATCH".parse()?;
    /// client
    ///     .builder(method, "/repos/octocat/hello-world")
    ///     .body(serde_json::json!({"has_wiki": false}))
    ///     .send()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(&self, method: Method, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            request: Request::new(method, path),
        }
    }

    /// Starts a GET request.
    ///
    /// # Parameters
    ///
    /// * `path` - Resource path, beginning with `/`
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn example(client: hubrest::Client) -> hubrest::Result<()> {
    /// let user = client.get("/user").send().await?;
    /// println!("{:?}", user.body);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.builder(Method::Get, path)
    }

    /// Starts a PUT request. See [`get`](Self::get).
    pub fn put(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.builder(Method::Put, path)
    }

    /// Starts a HEAD request. The response body is always absent.
    pub fn head(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.builder(Method::Head, path)
    }

    /// Starts a POST request. Attach the payload with
    /// [`RequestBuilder::body`].
    pub fn post(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.builder(Method::Post, path)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.builder(Method::Patch, path)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        self.builder(Method::Delete, path)
    }

    /// Performs a request, following pagination when asked to.
    ///
    /// # Returns
    ///
    /// The decoded response. For paginated requests the body is the
    /// concatenation of every page's list and status and headers are those
    /// of the last page. With errors suppressed, a failed page adds its
    /// body only when it is a list and pagination continues past it.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] for non-2xx statuses unless errors are suppressed
    /// - [`Error::InvalidArgument`] for unusable requests
    /// - [`Error::NotAList`] when a paginated page is not a JSON array
    /// - [`Error::TransportInvariant`] for malformed responses
    /// - credential and network errors as they occur
    pub async fn request(&self, request: Request) -> Result<Response> {
        request.validate()?;

        let host = normalize_host(request.host.as_deref().unwrap_or(&self.default_host));
        let authorization = self.authenticator().authorization(
            &host,
            &request.auth,
            request.username.as_deref(),
        )?;
        let body = encode_body(request.body.as_ref())?;

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(value) = authorization {
            headers.push(("Authorization".to_string(), value));
        }
        headers.extend(request.headers.iter().cloned());

        let call = Call {
            request: &request,
            host: &host,
            headers: &headers,
            body: body.as_deref(),
        };

        if !request.paginate {
            return self.dispatch(&call, &request.params).await;
        }

        // Pages are fetched one at a time; the loop keeps stack use flat.
        let mut pages = Pages::new();
        let mut params = request.params.clone();
        loop {
            // A failure status only gets here when errors are suppressed.
            let response = self.dispatch(&call, &params).await?;
            let Response {
                status,
                headers,
                body,
                link,
                next_page,
            } = response;
            if is_success(status) {
                pages.push(body)?;
            } else {
                tracing::debug!("Page of {} failed with {}, continuing", request.path, status);
                pages.push_failed(body);
            }

            match next_page {
                Some(token) => {
                    tracing::debug!(
                        "Following page {} of {} (page {} fetched)",
                        token,
                        request.path,
                        pages.page_count()
                    );
                    params = continuation_params(&params, &token);
                }
                None => {
                    return Ok(Response {
                        status,
                        headers,
                        body: Some(pages.into_value()),
                        link,
                        next_page: None,
                    });
                }
            }
        }
    }

    fn authenticator(&self) -> Authenticator<'_> {
        Authenticator::new(
            self.store.as_ref(),
            self.usernames.as_ref(),
            self.provider.as_ref(),
            &self.package,
        )
    }

    async fn dispatch(&self, call: &Call<'_>, params: &Params) -> Result<Response> {
        let query = params.encode();
        let url = build_url(call.host, &call.request.path, query.as_deref())?;
        let prepared = PreparedRequest {
            method: call.request.method,
            url,
            headers: call.headers.to_vec(),
            body: call.body.map(<[u8]>::to_vec),
        };

        tracing::debug!("{} {}", prepared.method, prepared.url);
        let raw = self.transport.execute(&prepared).await?;
        let response = parse_response(raw, &call.request.decoder)?;
        tracing::debug!("{} {} -> {}", prepared.method, prepared.url, response.status);

        if !call.request.suppress_errors {
            let failure = classify(response.status, || RequestContext {
                method: call.request.method,
                path: call.request.path.clone(),
                params: query.clone(),
                body: call.body.map(|b| String::from_utf8_lossy(b).into_owned()),
                response: response.body.clone(),
            });
            if let Some(err) = failure {
                return Err(err.into());
            }
        }

        Ok(response)
    }
}

/// Per-call values shared by every page of one request.
struct Call<'a> {
    request: &'a Request,
    host: &'a str,
    headers: &'a [(String, String)],
    body: Option<&'a [u8]>,
}

/// Builder for a request bound to a [`Client`].
///
/// Created by [`Client::get`] and its siblings; finish with
/// [`send`](Self::send).
#[must_use = "a request does nothing until it is sent"]
pub struct RequestBuilder<'a> {
    client: &'a Client,
    request: Request,
}

impl<'a> RequestBuilder<'a> {
    /// Sets a query parameter, replacing an earlier value for the same key.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.request.params.set(key, value);
        self
    }

    /// Replaces all query parameters.
    pub fn params(mut self, params: Params) -> Self {
        self.request.params = params;
        self
    }

    /// Sets the JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.request.body = Some(body);
        self
    }

    /// Adds a header sent after `Content-Type` and `Authorization`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Follows `rel="next"` links and merges every page into one list.
    ///
    /// The caller must not set `page` itself.
    pub fn paginate(mut self) -> Self {
        self.request.paginate = true;
        self
    }

    /// Returns failure statuses as plain responses instead of errors.
    pub fn suppress_errors(mut self) -> Self {
        self.request.suppress_errors = true;
        self
    }

    /// Sets how the response body is decoded. JSON by default.
    pub fn decoder(mut self, decoder: Decoder) -> Self {
        self.request.decoder = decoder;
        self
    }

    /// Authenticates as this user instead of the configured one.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.request.username = Some(username.into());
        self
    }

    /// Sets the credential specifier.
    pub fn auth(mut self, auth: Auth) -> Self {
        self.request.auth = auth;
        self
    }

    /// Sends the request to another host than the client's default.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.request.host = Some(host.into());
        self
    }

    /// Returns the request without sending it.
    pub fn build(self) -> Request {
        self.request
    }

    /// Sends the request. See [`Client::request`] for the errors.
    pub async fn send(self) -> Result<Response> {
        self.client.request(self.request).await
    }
}
