//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving source pages from HTTP/HTTPS
//! URLs, local files, and standard input. [`Fetcher`] keeps one HTTP client
//! alive so repeated fetches reuse pooled connections.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{RestylerError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

/// A reusable HTTP session for fetching source pages.
///
/// Cloning a Fetcher is cheap and clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Builds a Fetcher from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RestylerError::HttpError`] if the TLS backend cannot be initialised.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(RestylerError::HttpError)?;

        Ok(Self { client, config })
    }

    /// Gets the active configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetches a page and returns its body as text.
    ///
    /// Follows redirects and treats any non-success status as an error.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let parsed_url = parse_http_url(url)?;

        let response = self
            .client
            .get(parsed_url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let response = response.error_for_status().map_err(|e| self.classify_error(e))?;
        let content = response.text().await.map_err(|e| self.classify_error(e))?;

        tracing::debug!(url, bytes = content.len(), "fetched source page");
        Ok(content)
    }

    fn classify_error(&self, err: reqwest::Error) -> RestylerError {
        tracing::warn!(error = %err, "fetch failed");
        if err.is_timeout() {
            RestylerError::Timeout { timeout: self.config.timeout }
        } else {
            RestylerError::HttpError(err)
        }
    }
}

fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| RestylerError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(RestylerError::InvalidUrl(format!(
            "unsupported scheme '{}', expected http:// or https://",
            other
        ))),
    }
}

/// Fetches a page with a one-off client.
///
/// Prefer [`Fetcher`] when fetching more than once.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    Fetcher::new(config.clone())?.fetch(url).await
}

/// Reads content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(RestylerError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(RestylerError::from)
    }
}

/// Reads content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(RestylerError::from)?;

    Ok(buffer)
}
