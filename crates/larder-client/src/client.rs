//! Main Chef Infra Server API client implementation.

use crate::api::*;
use larder_core::{LarderError, Result};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// API version negotiated with the server
const API_VERSION: &str = "1";

/// Main Chef Infra Server API client
#[derive(Clone)]
pub struct ChefClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: String,
    client_name: String,
}

impl ChefClient {
    /// Create a new client for the given server URL and client identity
    /// using default settings
    pub fn new(server_url: impl Into<String>, client_name: impl Into<String>) -> Result<Self> {
        ChefClientBuilder::new(server_url, client_name).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(
        server_url: impl Into<String>,
        client_name: impl Into<String>,
    ) -> ChefClientBuilder {
        ChefClientBuilder::new(server_url, client_name)
    }

    /// The client identity used for requests
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.inner.client_name
    }

    /// Access node endpoints
    #[must_use]
    pub fn nodes(&self) -> NodesApi<'_> {
        NodesApi::new(self)
    }

    /// Access role endpoints
    #[must_use]
    pub fn roles(&self) -> RolesApi<'_> {
        RolesApi::new(self)
    }

    /// Access environment endpoints
    #[must_use]
    pub fn environments(&self) -> EnvironmentsApi<'_> {
        EnvironmentsApi::new(self)
    }

    /// Access cookbook endpoints
    #[must_use]
    pub fn cookbooks(&self) -> CookbooksApi<'_> {
        CookbooksApi::new(self)
    }

    /// Access search endpoints
    #[must_use]
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Perform a GET request
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Perform a GET request with query parameters
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LarderError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Perform a POST request with a JSON body and query parameters
    pub(crate) async fn post_with_query<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path, params);
        debug!(url = %url, "POST request");

        let response = self
            .inner
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| LarderError::Http(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Fetch raw bytes from an absolute URL (cookbook file downloads).
    ///
    /// Manifest file URLs are fully qualified, often presigned, so they are
    /// requested as-is rather than relative to the base URL.
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, "GET file content");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LarderError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| LarderError::Http(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{}", self.inner.base_url, path);

        let mut separator = '?';
        for (key, value) in params {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }

        url
    }

    /// Handle an API response that returns JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| LarderError::Http(e.to_string()))?;
            serde_json::from_str(&body).map_err(LarderError::Json)
        } else {
            self.handle_error(status.as_u16(), response).await
        }
    }

    /// Convert an error response to a LarderError
    async fn handle_error<T>(&self, status: u16, response: reqwest::Response) -> Result<T> {
        let body = response.text().await.unwrap_or_default();

        // Chef servers report errors as {"error": ["message", ...]} or
        // {"error": "message"}; fall back to the raw body otherwise
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                let err = v.get("error")?;
                err.as_str().map(String::from).or_else(|| {
                    err.as_array().map(|parts| {
                        parts
                            .iter()
                            .filter_map(|p| p.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                })
            })
            .unwrap_or(body);

        match status {
            401 => Err(LarderError::Unauthorized),
            404 => Err(LarderError::NotFound { resource: message }),
            _ => {
                warn!(code = status, %message, "API error response");
                Err(LarderError::Api {
                    code: status,
                    message,
                })
            }
        }
    }
}

/// Builder for configuring a [`ChefClient`]
pub struct ChefClientBuilder {
    base_url: String,
    client_name: String,
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
}

impl ChefClientBuilder {
    /// Create a new builder for the given server URL and client identity
    #[must_use]
    pub fn new(server_url: impl Into<String>, client_name: impl Into<String>) -> Self {
        let mut base_url: String = server_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            base_url,
            client_name: client_name.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("larder/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Skip TLS certificate verification (for servers with self-signed
    /// certificates; mirrors the `--ssl-no-verify` flag)
    #[must_use]
    pub const fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ChefClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "X-Ops-Server-API-Version",
            reqwest::header::HeaderValue::from_static(API_VERSION),
        );
        headers.insert(
            "X-Ops-UserId",
            reqwest::header::HeaderValue::from_str(&self.client_name)
                .map_err(|e| LarderError::Config(format!("invalid client name: {e}")))?,
        );

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .gzip(true)
            .build()
            .map_err(|e| LarderError::Http(e.to_string()))?;

        Ok(ChefClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: self.base_url,
                client_name: self.client_name,
            }),
        })
    }
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
