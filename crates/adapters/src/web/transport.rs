// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the portal client.
//!
//! The client builds requests as plain data so that tests can swap the
//! network for [`FakeTransport`] and inspect exactly what would be sent.

use super::WebError;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::sync::Arc;
use std::time::Duration;

/// Base URL of the DIDE cluster portal
pub const DEFAULT_BASE_URL: &str = "https://mrcdata.dide.ic.ac.uk/hpc/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request relative to the portal's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Form fields for POST, in order
    pub form: Vec<(String, String)>,
    /// Query parameters for GET, in order
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(path: &str, query: Vec<(String, String)>) -> Self {
        Self { method: HttpMethod::Get, path: path.to_string(), form: Vec::new(), query }
    }

    pub fn post(path: &str, form: Vec<(String, String)>) -> Self {
        Self { method: HttpMethod::Post, path: path.to_string(), form, query: Vec::new() }
    }

    /// Value of a form field, if present
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }
}

/// Sends portal requests. Implementations keep the session cookie.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, WebError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, WebError> {
        (**self).send(request).await
    }
}

/// Real transport over `reqwest`, with a cookie store for the PHP session
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, WebError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, WebError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(WebError::Http)?;
        let base_url =
            if base_url.ends_with('/') { base_url.to_string() } else { format!("{base_url}/") };
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, WebError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = ?request.method, %url, "portal request");
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url).query(&request.query),
            HttpMethod::Post => self.client.post(&url).header(ACCEPT, "text/plain").form(&request.form),
        };
        let response = builder.send().await.map_err(WebError::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(WebError::Http)?;
        if !status.is_success() {
            return Err(WebError::Status { path: request.path, status: status.as_u16(), body });
        }
        Ok(HttpResponse { status: status.as_u16(), body })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{HttpRequest, HttpResponse, HttpTransport};
    use crate::web::WebError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeTransportState {
        requests: Vec<HttpRequest>,
        responses: HashMap<String, VecDeque<HttpResponse>>,
    }

    /// Fake transport: records requests and replays queued responses per path.
    ///
    /// A path with nothing queued answers `200` with an empty body.
    #[derive(Clone, Default)]
    pub struct FakeTransport {
        inner: Arc<Mutex<FakeTransportState>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a `200` response for the next request to `path`
        pub fn respond(&self, path: &str, body: impl Into<String>) -> &Self {
            self.respond_with(path, HttpResponse::ok(body))
        }

        pub fn respond_with(&self, path: &str, response: HttpResponse) -> &Self {
            self.inner.lock().responses.entry(path.to_string()).or_default().push_back(response);
            self
        }

        /// All requests sent so far
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.inner.lock().requests.clone()
        }

        /// Paths of all requests sent so far
        pub fn paths(&self) -> Vec<String> {
            self.inner.lock().requests.iter().map(|r| r.path.clone()).collect()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, WebError> {
            let mut state = self.inner.lock();
            let response = state
                .responses
                .get_mut(&request.path)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| HttpResponse::ok(""));
            let path = request.path.clone();
            state.requests.push(request);
            if response.status >= 400 {
                return Err(WebError::Status { path, status: response.status, body: response.body });
            }
            Ok(response)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;
