use std::sync::Arc;

use chrono::NaiveDateTime;
use feed_core::{Identified, Page};
use serde::Deserialize;
use url::Url;

use crate::{ApiClient, ApiError, Endpoint, PageSource};

const PUBLISHED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Length of a `yyyy-MM-ddTHH:mm:ss` stamp; anything after it is ignored.
const PUBLISHED_DATE_LEN: usize = 19;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteNews {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub full_url: Option<String>,
    #[serde(default)]
    pub title_image_url: Option<String>,
    #[serde(default)]
    pub category_type: Option<String>,
}

impl RemoteNews {
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        let raw = self.published_date.as_deref()?;
        let stamp = raw.get(..PUBLISHED_DATE_LEN).unwrap_or(raw);
        NaiveDateTime::parse_from_str(stamp, PUBLISHED_DATE_FORMAT).ok()
    }

    /// Target of the detail web view.
    pub fn detail_url(&self) -> Option<Url> {
        self.full_url.as_deref().and_then(|raw| Url::parse(raw).ok())
    }
}

impl Identified for RemoteNews {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteNewsResponse {
    pub news: Vec<RemoteNews>,
}

#[async_trait::async_trait]
pub trait NewsService: Send + Sync {
    async fn news(&self, page: Page, count: u32) -> Result<Vec<RemoteNews>, ApiError>;
}

#[derive(Clone)]
pub struct RemoteNewsService {
    client: ApiClient,
}

impl RemoteNewsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl NewsService for RemoteNewsService {
    async fn news(&self, page: Page, count: u32) -> Result<Vec<RemoteNews>, ApiError> {
        let response: RemoteNewsResponse =
            self.client.request_model(&Endpoint::news(page, count)).await?;
        Ok(response.news)
    }
}

/// Feeds a [`crate::PaginatedLoader`] from a [`NewsService`] with a fixed page size.
pub struct NewsPageSource {
    service: Arc<dyn NewsService>,
    page_size: u32,
}

impl NewsPageSource {
    pub fn new(service: Arc<dyn NewsService>, page_size: u32) -> Self {
        Self { service, page_size }
    }
}

#[async_trait::async_trait]
impl PageSource for NewsPageSource {
    type Item = RemoteNews;
    type Error = ApiError;

    async fn fetch_page(&self, page: Page, _force: bool) -> Result<Vec<RemoteNews>, ApiError> {
        self.service.news(page, self.page_size).await
    }
}
