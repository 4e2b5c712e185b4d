use std::sync::Arc;

use crate::{
    ApiClient, ApiError, ConfigError, ErrorSink, FeedConfig, ImageLoader, LoaderSettings,
    NewsPageSource, NewsService, PaginatedLoader, RemoteNews, RemoteNewsService, ReqwestTransport,
    Transport,
};

/// Everything the news screens need, wired from one configuration.
pub struct Services {
    pub news: Arc<dyn NewsService>,
    pub images: Arc<ImageLoader>,
    page_size: u32,
    loader_settings: LoaderSettings,
}

impl Services {
    /// Image downloads get their own transport so binary bodies stay out of the log.
    pub fn from_config(config: &FeedConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let api: Arc<dyn Transport> =
            Arc::new(ReqwestTransport::new(config.transport_settings())?);
        let images: Arc<dyn Transport> =
            Arc::new(ReqwestTransport::new(config.image_transport_settings())?);
        Ok(Self::with_transports(config, api, images))
    }

    /// Wires the services over existing transports; `config` is assumed valid.
    pub fn with_transports(
        config: &FeedConfig,
        api: Arc<dyn Transport>,
        images: Arc<dyn Transport>,
    ) -> Self {
        let client = ApiClient::new(config.base_url.clone(), api);
        Self {
            news: Arc::new(RemoteNewsService::new(client)),
            images: Arc::new(ImageLoader::new(config.image_settings(), images)),
            page_size: config.page_size,
            loader_settings: config.loader_settings(),
        }
    }

    pub fn news_loader(
        &self,
        error_sink: Box<dyn ErrorSink<ApiError>>,
    ) -> std::io::Result<PaginatedLoader<RemoteNews, ApiError>> {
        let source = NewsPageSource::new(Arc::clone(&self.news), self.page_size);
        PaginatedLoader::spawn(source, self.loader_settings, error_sink)
    }
}
