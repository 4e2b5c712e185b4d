use std::time::Duration;

use bytes::{Bytes, BytesMut};
use feed_logging::{feed_error, feed_info};
use futures_util::StreamExt;
use serde::Deserialize;

use crate::{HttpMethod, NetworkTarget, ResponseError, TransportError};

/// How much of the traffic the transport writes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum NetworkLogLevel {
    None,
    Error,
    Info,
    #[default]
    Verbose,
}

impl NetworkLogLevel {
    fn logs_requests(self) -> bool {
        matches!(self, NetworkLogLevel::Info | NetworkLogLevel::Verbose)
    }

    fn logs_failures(self) -> bool {
        matches!(self, NetworkLogLevel::Error | NetworkLogLevel::Verbose)
    }

    fn logs_bodies(self) -> bool {
        self == NetworkLogLevel::Verbose
    }

    /// Same level with response body logging removed, for binary payloads.
    pub fn without_bodies(self) -> Self {
        match self {
            NetworkLogLevel::Verbose => NetworkLogLevel::Error,
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub log_level: NetworkLogLevel,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 20 * 1024 * 1024,
            log_level: NetworkLogLevel::default(),
        }
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request; only statuses in `200..=299` count as success.
    async fn request(&self, target: &NetworkTarget) -> Result<Bytes, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    settings: TransportSettings,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Bytes, TransportError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(TransportError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(TransportError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }

    fn log_failure(&self, target: &NetworkTarget, err: &TransportError) {
        if self.settings.log_level.logs_failures() {
            feed_error!("<-- {} {} failed: {}", target.method, target.url(), err);
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, target: &NetworkTarget) -> Result<Bytes, TransportError> {
        let url = target.url();
        let parsed =
            reqwest::Url::parse(&url).map_err(|err| TransportError::InvalidUrl(err.to_string()))?;

        if self.settings.log_level.logs_requests() {
            feed_info!("--> {} {}", target.method, parsed);
        }

        let response = match self
            .client
            .request(map_method(target.method), parsed)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let err = map_reqwest_error(err);
                self.log_failure(target, &err);
                return Err(err);
            }
        };

        let status = response.status();
        let body = match self.read_body(response).await {
            Ok(body) => body,
            Err(err) => {
                self.log_failure(target, &err);
                return Err(err);
            }
        };

        if !status.is_success() {
            let err = TransportError::Response(ResponseError::new(Some(status.as_u16()), body));
            self.log_failure(target, &err);
            return Err(err);
        }

        if self.settings.log_level.logs_bodies() {
            feed_info!(
                "<-- {} {} ({} bytes)\n{}",
                status.as_u16(),
                url,
                body.len(),
                String::from_utf8_lossy(&body)
            );
        }
        Ok(body)
    }
}

fn map_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    TransportError::Network(err.to_string())
}
