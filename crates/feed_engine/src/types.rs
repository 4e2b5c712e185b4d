use std::fmt;

use bytes::Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical API call, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
        }
    }

    /// `GET /news/{page}/{count}`
    pub fn news(page: u32, count: u32) -> Self {
        Self::get(format!("/news/{page}/{count}"))
    }
}

/// Fully specified request handed to a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub base_url: String,
    pub path: String,
    pub method: HttpMethod,
}

impl NetworkTarget {
    /// Base URL and path joined by plain concatenation with a single `/` between them.
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Non-2xx answer (or an answer without a status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseError {
    pub status_code: Option<u16>,
    /// Raw body; empty bodies are stored as `None`.
    pub body: Option<Bytes>,
}

impl ResponseError {
    pub fn new(status_code: Option<u16>, body: Bytes) -> Self {
        Self {
            status_code,
            body: if body.is_empty() { None } else { Some(body) },
        }
    }

    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network api error")?;
        if let Some(code) = self.status_code {
            write!(f, " (status code {code})")?;
        }
        // Only JSON bodies are echoed; HTML error pages are noise in a one-line message.
        let json_body = self
            .body
            .as_ref()
            .and_then(|body| serde_json::from_slice::<serde_json::Value>(body).ok());
        if let Some(body) = json_body {
            write!(f, ": {body}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResponseError {}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Response(ResponseError),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    pub fn as_response(&self) -> Option<&ResponseError> {
        match self {
            TransportError::Response(response) => Some(response),
            _ => None,
        }
    }
}
