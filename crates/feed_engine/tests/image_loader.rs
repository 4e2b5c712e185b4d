use std::io::Cursor;
use std::sync::Arc;

use feed_engine::{
    ImageLoader, ImageSettings, NetworkLogLevel, ReqwestTransport, Transport, TransportSettings,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use url::Url;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([200, 10, 10])));
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}

fn loader(base_url: String) -> ImageLoader {
    let settings = TransportSettings {
        log_level: NetworkLogLevel::None,
        ..TransportSettings::default()
    };
    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::new(settings).expect("transport"));
    ImageLoader::new(ImageSettings::new(base_url), transport)
}

#[tokio::test]
async fn relative_path_is_fetched_from_image_host_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(40, 30)))
        .expect(1)
        .mount(&server)
        .await;

    let loader = loader(server.uri());
    let first = loader.load(Some("photo.jpg")).await.expect("image");
    assert_eq!((first.width(), first.height()), (40, 30));

    let second = loader.load(Some("photo.jpg")).await.expect("cached image");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(loader.cache().len(), 1);
}

#[tokio::test]
async fn absolute_url_bypasses_image_host() {
    let image_host = MockServer::start().await;
    let cdn = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(8, 8)))
        .expect(1)
        .mount(&cdn)
        .await;

    let loader = loader(image_host.uri());
    let url = format!("{}/x.png", cdn.uri());
    assert!(loader.load(Some(&url)).await.is_some());
}

#[tokio::test]
async fn large_image_is_downsampled_before_caching() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wide.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(2000, 1000)))
        .mount(&server)
        .await;

    let image = loader(server.uri())
        .load(Some("wide.png"))
        .await
        .expect("image");
    assert_eq!((image.width(), image.height()), (1080, 540));
}

#[tokio::test]
async fn failures_resolve_to_no_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/garbage.png"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not an image"))
        .mount(&server)
        .await;

    let loader = loader(server.uri());
    assert!(loader.load(Some("missing.png")).await.is_none());
    assert!(loader.load(Some("garbage.png")).await.is_none());
    assert!(loader.cache().is_empty());
}

#[tokio::test]
async fn blank_reference_never_touches_the_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(4, 4)))
        .expect(0)
        .mount(&server)
        .await;

    let loader = loader(server.uri());
    assert!(loader.load(None).await.is_none());
    assert!(loader.load(Some("")).await.is_none());
    assert!(loader.load(Some("   ")).await.is_none());
    assert!(loader.cache().is_empty());
    server.verify().await;
}

#[tokio::test]
async fn file_url_is_read_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("local.png");
    std::fs::write(&file, png_bytes(12, 24)).expect("write png");
    let url = Url::from_file_path(&file).expect("file url");

    let loader = loader("https://file.example.com".to_string());
    let image = loader.load(Some(url.as_str())).await.expect("image");
    assert_eq!((image.width(), image.height()), (12, 24));
}
