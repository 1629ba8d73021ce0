//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a run:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for pages, sitemaps and robots.txt
//! - Content-Type checks against the kind of document the caller expects
//! - Error classification
//!
//! Failures are values, not errors: every outcome is a [`FetchResult`] and
//! nothing is retried.

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// The kind of document a request is expected to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Content-Type must mention `html`
    Html,
    /// Content-Type must mention `xml`
    Xml,
    /// Any Content-Type is accepted
    Any,
}

impl ContentKind {
    /// Checks a Content-Type header value against this kind
    pub fn accepts(&self, content_type: &str) -> bool {
        let content_type = content_type.to_ascii_lowercase();
        match self {
            Self::Html => content_type.contains("html"),
            Self::Xml => content_type.contains("xml"),
            Self::Any => true,
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the document
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// Content-Type header value
        content_type: String,
        /// Decoded body
        body: String,
    },

    /// The Content-Type did not match the expected kind
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Short human-readable description, used in logs
    pub fn describe(&self) -> String {
        match self {
            Self::Success { content_type, .. } => format!("ok ({})", content_type),
            Self::ContentMismatch { content_type } => {
                format!("unexpected content type '{}'", content_type)
            }
            Self::HttpError { status_code } => format!("HTTP {}", status_code),
            Self::NetworkError { error } => error.clone(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout for a single request
///
/// # Example
///
/// ```no_run
/// use docmirror::config::UserAgentConfig;
/// use docmirror::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(20)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 with an acceptable Content-Type | `Success` |
/// | HTTP 200 with another Content-Type | `ContentMismatch` |
/// | Any other final status | `HttpError` |
/// | Timeout, connection or body error | `NetworkError` |
///
/// Redirects are followed by the client; `final_url` is where they ended.
pub async fn fetch_url(client: &Client, url: &str, expected: ContentKind) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !expected.accepts(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            content_type,
            body,
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
