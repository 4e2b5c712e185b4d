use std::time::Duration;

use feed_core::{FailurePolicy, Page, DEFAULT_INITIAL_PAGE};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::images::{DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_DIMENSION};
use crate::{ImageSettings, LoaderSettings, NetworkLogLevel, TransportError, TransportSettings};

/// Page size the news list requests.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base_url {url:?}: {message}")]
    BaseUrl { url: String, message: String },
    #[error("invalid image_base_url {url:?}: {message}")]
    ImageBaseUrl { url: String, message: String },
    #[error("page_size must be greater than zero")]
    PageSize,
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

/// Failure policy as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FailurePolicyConfig {
    #[default]
    Keep,
    Settle,
}

impl From<FailurePolicyConfig> for FailurePolicy {
    fn from(value: FailurePolicyConfig) -> Self {
        match value {
            FailurePolicyConfig::Keep => FailurePolicy::Keep,
            FailurePolicyConfig::Settle => FailurePolicy::Settle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    pub base_url: String,
    pub image_base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_initial_page")]
    pub initial_page: Page,
    #[serde(default)]
    pub network_log_level: NetworkLogLevel,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
    #[serde(default = "default_image_cache_capacity")]
    pub image_cache_capacity: usize,
    #[serde(default)]
    pub failure_policy: FailurePolicyConfig,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_initial_page() -> Page {
    DEFAULT_INITIAL_PAGE
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_image_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}

fn default_image_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl FeedConfig {
    pub fn new(base_url: impl Into<String>, image_base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            image_base_url: image_base_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            initial_page: DEFAULT_INITIAL_PAGE,
            network_log_level: NetworkLogLevel::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_image_dimension: DEFAULT_MAX_DIMENSION,
            image_cache_capacity: DEFAULT_CACHE_CAPACITY,
            failure_policy: FailurePolicyConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url(&self.base_url).map_err(|message| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            message,
        })?;
        check_http_url(&self.image_base_url).map_err(|message| ConfigError::ImageBaseUrl {
            url: self.image_base_url.clone(),
            message,
        })?;
        if self.page_size == 0 {
            return Err(ConfigError::PageSize);
        }
        Ok(())
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            log_level: self.network_log_level,
            ..TransportSettings::default()
        }
    }

    /// Image downloads share the timeouts but never log response bodies.
    pub fn image_transport_settings(&self) -> TransportSettings {
        TransportSettings {
            log_level: self.network_log_level.without_bodies(),
            ..self.transport_settings()
        }
    }

    pub fn image_settings(&self) -> ImageSettings {
        ImageSettings {
            base_url: self.image_base_url.clone(),
            max_dimension: self.max_image_dimension,
            cache_capacity: self.image_cache_capacity,
        }
    }

    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            initial_page: self.initial_page,
            failure_policy: self.failure_policy.into(),
        }
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme {other}")),
    }
}
