//! Feed engine: HTTP pipeline, news service, image loading and the paginated loader driver.
mod client;
mod config;
mod images;
mod loader;
mod news;
mod services;
mod transport;
mod types;

pub use client::{log_api_error, ApiClient, ApiError};
pub use config::{ConfigError, FailurePolicyConfig, FeedConfig, DEFAULT_PAGE_SIZE};
pub use images::{
    cache_key, fit_within, resolve_image_url, ImageCache, ImageLoader, ImageSettings,
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_DIMENSION, IMAGE_CACHE_KEY_SUFFIX,
};
pub use loader::{
    ChannelErrorSink, ErrorSink, LoaderSettings, LogErrorSink, PageSource, PaginatedLoader,
};
pub use news::{NewsPageSource, NewsService, RemoteNews, RemoteNewsResponse, RemoteNewsService};
pub use services::Services;
pub use transport::{NetworkLogLevel, ReqwestTransport, Transport, TransportSettings};
pub use types::{Endpoint, HttpMethod, NetworkTarget, ResponseError, TransportError};

pub use feed_core::{FailurePolicy, Page, Paginated};
