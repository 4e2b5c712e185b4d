use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use feed_logging::{feed_debug, feed_trace, feed_warn};
use image::imageops::FilterType;
use image::DynamicImage;
use url::Url;

use crate::{HttpMethod, NetworkTarget, Transport, TransportError};

/// Appended to every cache key. Entries stored under another suffix are never read.
pub const IMAGE_CACHE_KEY_SUFFIX: &str = "_2.0";
pub const DEFAULT_MAX_DIMENSION: u32 = 1080;
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ImageSettings {
    /// Root that relative image paths are resolved against.
    pub base_url: String,
    pub max_dimension: u32,
    pub cache_capacity: usize,
}

impl ImageSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_dimension: DEFAULT_MAX_DIMENSION,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Best-effort in-memory cache. When full, an arbitrary entry makes room.
pub struct ImageCache {
    entries: Mutex<HashMap<String, Arc<DynamicImage>>>,
    capacity: usize,
}

impl ImageCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<DynamicImage>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: String, image: Arc<DynamicImage>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            if let Some(victim) = entries.keys().next().cloned() {
                entries.remove(&victim);
            }
        }
        entries.insert(key, image);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves a feed image reference to an absolute URL.
///
/// `file:` URLs are used as-is; anything not starting with `http` is a
/// percent-encoded path below `base_url`; the rest must parse as absolute.
pub fn resolve_image_url(base_url: &str, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(raw) {
        if url.scheme() == "file" {
            return Some(url);
        }
    }
    if !raw.starts_with("http") {
        let decoded = urlencoding::decode(raw).ok()?;
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            decoded.trim_start_matches('/')
        );
        return Url::parse(&joined).ok();
    }
    Url::parse(raw).ok()
}

pub fn cache_key(url: &Url) -> String {
    format!("{}{}", url.as_str(), IMAGE_CACHE_KEY_SUFFIX)
}

/// Scales the image down so its longest side is at most `max_dimension`.
pub fn fit_within(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width().max(image.height()) <= max_dimension {
        return image;
    }
    image.resize(max_dimension, max_dimension, FilterType::Triangle)
}

pub struct ImageLoader {
    settings: ImageSettings,
    cache: ImageCache,
    transport: Arc<dyn Transport>,
}

impl ImageLoader {
    pub fn new(settings: ImageSettings, transport: Arc<dyn Transport>) -> Self {
        let cache = ImageCache::new(settings.cache_capacity);
        Self {
            settings,
            cache,
            transport,
        }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Loads, downsamples and caches an image. Every failure yields `None`.
    pub async fn load(&self, raw: Option<&str>) -> Option<Arc<DynamicImage>> {
        let raw = raw?;
        let Some(url) = resolve_image_url(&self.settings.base_url, raw) else {
            feed_debug!("unresolvable image reference {raw:?}");
            return None;
        };

        let key = cache_key(&url);
        if let Some(hit) = self.cache.get(&key) {
            feed_trace!("image cache hit {key}");
            return Some(hit);
        }

        let bytes = match self.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                feed_warn!("image fetch failed for {url}: {err}");
                return None;
            }
        };

        let max_dimension = self.settings.max_dimension;
        let decoded = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|image| fit_within(image, max_dimension))
        })
        .await;
        let image = match decoded {
            Ok(Ok(image)) => Arc::new(image),
            Ok(Err(err)) => {
                feed_warn!("image decode failed for {url}: {err}");
                return None;
            }
            Err(err) => {
                feed_warn!("image decode task failed for {url}: {err}");
                return None;
            }
        };

        self.cache.insert(key, Arc::clone(&image));
        Some(image)
    }

    async fn fetch(&self, url: &Url) -> Result<Bytes, TransportError> {
        if url.scheme() == "file" {
            let path = url
                .to_file_path()
                .map_err(|()| TransportError::InvalidUrl(url.to_string()))?;
            return tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|err| TransportError::Network(err.to_string()));
        }
        let target = NetworkTarget {
            base_url: url.to_string(),
            path: String::new(),
            method: HttpMethod::Get,
        };
        self.transport.request(&target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    const BASE: &str = "https://file.example.com";

    fn resolved(raw: &str) -> Option<String> {
        resolve_image_url(BASE, raw).map(|url| url.to_string())
    }

    #[test]
    fn relative_path_joins_image_base() {
        assert_eq!(
            resolved("photo.jpg").as_deref(),
            Some("https://file.example.com/photo.jpg")
        );
        assert_eq!(
            resolved("/news/2024/photo.jpg").as_deref(),
            Some("https://file.example.com/news/2024/photo.jpg")
        );
    }

    #[test]
    fn relative_path_is_percent_decoded_first() {
        assert_eq!(
            resolved("news%2Fphoto.jpg").as_deref(),
            Some("https://file.example.com/news/photo.jpg")
        );
    }

    #[test]
    fn absolute_and_file_urls_pass_through() {
        assert_eq!(
            resolved("https://cdn.example.com/x.png").as_deref(),
            Some("https://cdn.example.com/x.png")
        );
        assert_eq!(
            resolved("file:///tmp/x.png").as_deref(),
            Some("file:///tmp/x.png")
        );
    }

    #[test]
    fn blank_or_broken_references_do_not_resolve() {
        assert_eq!(resolved(""), None);
        assert_eq!(resolved("   "), None);
        assert_eq!(resolved("http://"), None);
    }

    #[test]
    fn cache_key_carries_suffix() {
        let url = Url::parse("https://cdn.example.com/x.png").unwrap();
        assert_eq!(cache_key(&url), "https://cdn.example.com/x.png_2.0");
    }

    #[test]
    fn oversized_images_are_scaled_proportionally() {
        let wide = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(2000, 1000, Rgb([1, 2, 3])));
        let fitted = fit_within(wide, 1080);
        assert_eq!((fitted.width(), fitted.height()), (1080, 540));

        let small = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(300, 200, Rgb([1, 2, 3])));
        let kept = fit_within(small, 1080);
        assert_eq!((kept.width(), kept.height()), (300, 200));
    }

    #[test]
    fn full_cache_evicts_to_stay_within_capacity() {
        let cache = ImageCache::new(2);
        let image = Arc::new(DynamicImage::ImageRgb8(ImageBuffer::from_pixel(1, 1, Rgb([0, 0, 0]))));
        cache.insert("a".into(), Arc::clone(&image));
        cache.insert("b".into(), Arc::clone(&image));
        cache.insert("c".into(), Arc::clone(&image));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("c").is_some());

        cache.insert("c".into(), image);
        assert_eq!(cache.len(), 2);
    }
}
