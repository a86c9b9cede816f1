//! HTTP fetching of attachment content.

use crate::error::ImportError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Desktop browser user agent; some origins reject default client agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Response of a GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal blocking HTTP client.
pub trait HttpClient {
    /// Issue a GET request with extra headers.
    ///
    /// Transport failures are errors; any status code is a response.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ImportError>;
}

/// [`HttpClient`] backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestClient {
    /// Create a client that waits for slow origins without a deadline.
    pub fn new() -> Result<Self, ImportError> {
        Self::with_timeout(None)
    }

    /// Create a client with an explicit request timeout (None disables it).
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, ImportError> {
        // reqwest's blocking client applies 30s unless told otherwise.
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::Http(format!("HTTP client error: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// Request timeout in effect, None when requests never time out.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ImportError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ImportError::Http(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ImportError::Http(format!("invalid header value: {e}")))?;
            header_map.insert(name, value);
        }

        let response = self
            .client
            .get(url)
            .headers(header_map)
            .send()
            .map_err(|e| ImportError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| ImportError::Http(e.to_string()))?
            .to_vec();

        log::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse::new(status, body))
    }
}

/// Download `url` with the given user agent, failing on non-2xx responses.
pub fn download(client: &dyn HttpClient, url: &str, user_agent: &str) -> Result<Vec<u8>, ImportError> {
    let response = client.get(url, &[(USER_AGENT.as_str(), user_agent)])?;

    if !response.is_success() {
        return Err(ImportError::HttpStatus {
            status: response.status,
            url: url.to_string(),
        });
    }

    Ok(response.body)
}
