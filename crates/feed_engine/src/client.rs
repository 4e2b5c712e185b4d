use std::sync::Arc;

use bytes::Bytes;
use feed_logging::feed_error;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{Endpoint, NetworkTarget, ResponseError, Transport, TransportError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to parse json: {0}")]
    Parse(#[source] serde_json::Error),
    #[error(transparent)]
    Response(ResponseError),
    #[error("system error: {0}")]
    System(#[source] TransportError),
}

impl ApiError {
    /// The wrapped error without the classification layer.
    pub fn raw_error(&self) -> &(dyn std::error::Error + 'static) {
        match self {
            ApiError::Parse(err) => err,
            ApiError::Response(err) => err,
            ApiError::System(err) => err,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Response(err) => err.status_code,
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Response(response) => ApiError::Response(response),
            other => ApiError::System(other),
        }
    }
}

/// Turns endpoints into transport calls against one base URL.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub async fn request(&self, endpoint: &Endpoint) -> Result<Bytes, ApiError> {
        let target = NetworkTarget {
            base_url: self.base_url.clone(),
            path: endpoint.path.clone(),
            method: endpoint.method,
        };
        self.transport
            .request(&target)
            .await
            .map_err(ApiError::from)
    }

    /// Requests `endpoint` and decodes the JSON body into `T`. Failures are logged before returning.
    pub async fn request_model<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, ApiError> {
        let result = match self.request(endpoint).await {
            Ok(body) => serde_json::from_slice(&body).map_err(ApiError::Parse),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            log_api_error(err);
        }
        result
    }
}

pub fn log_api_error(err: &ApiError) {
    feed_error!("api request failed: {err}");
    match err {
        ApiError::Parse(parse) => {
            feed_error!("parse json failed: {parse}");
        }
        ApiError::Response(response) => {
            if let Some(code) = response.status_code {
                feed_error!("response status code: {code}");
            }
            if let Some(body) = response.body_text() {
                feed_error!("response body: {body}");
            }
        }
        ApiError::System(system) => {
            feed_error!("system error: {system}");
        }
    }
}
