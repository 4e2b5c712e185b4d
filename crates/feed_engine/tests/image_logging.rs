use std::io::Cursor;
use std::sync::Mutex;

use feed_engine::{FeedConfig, Services};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use log::{LevelFilter, Log, Metadata, Record};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Keeps every formatted log line; this binary installs it as the global logger.
struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    lines: Mutex::new(Vec::new()),
};

fn png_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(50, 50, Rgb([0, 90, 200])));
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}

#[tokio::test]
async fn verbose_logging_keeps_image_bodies_out_of_the_log() {
    log::set_logger(&LOGGER).expect("install capturing logger");
    log::set_max_level(LevelFilter::Trace);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/1/15"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"news":[]}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
        .expect(1)
        .mount(&server)
        .await;

    // Default configuration logs at the verbose level.
    let services = Services::from_config(&FeedConfig::new(server.uri(), server.uri()))
        .expect("services");
    services.news.news(1, 15).await.expect("news");
    let image = services.images.load(Some("p.png")).await.expect("image");
    assert_eq!((image.width(), image.height()), (50, 50));

    let lines = LOGGER.lines.lock().expect("captured lines").clone();
    assert!(
        lines.iter().any(|line| line.contains(r#"{"news":[]}"#)),
        "api bodies are logged at the verbose level: {lines:?}"
    );
    assert!(
        !lines.iter().any(|line| line.contains("PNG") || line.contains('\u{FFFD}')),
        "image body leaked into the log: {lines:?}"
    );
}
