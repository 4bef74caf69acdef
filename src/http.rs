//! HTTP transport with timeouts and a single panel connection

use crate::command::PageRequest;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Performs one HTTP exchange with the panel and returns the page body.
///
/// Failures are returned as-is; retrying is up to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PageRequest) -> Result<String>;
}

/// Settings for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Panels usually serve a self-signed certificate
    pub accept_invalid_certs: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

pub struct HttpClient {
    inner: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, &HttpOptions::default())
    }

    pub fn with_options(base_url: &str, options: &HttpOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        // The panel's web server copes badly with parallel or kept-alive
        // connections, so each request gets a fresh one.
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &PageRequest) -> Result<String> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        tracing::debug!(
            "{} {} page={}",
            request.method,
            request.path,
            request.query_param("page").unwrap_or("-")
        );

        let mut builder = self.inner.request(request.method.clone(), &url);
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Request to {} failed with {}", request.path, status);
        }

        Ok(resp.error_for_status()?.text().await?)
    }
}
