use feed_core::FeedViewModel;
use feed_engine::{Paginated, RemoteNews};

const DATE_FORMAT: &str = "%d %B %Y %H:%M";
const UNTITLED: &str = "(untitled)";

/// Marker printed while a fetch is in flight; `None` once the feed settles.
pub(crate) fn loading_marker<T>(state: &Paginated<T>) -> Option<&'static str> {
    match state {
        Paginated::Loading => Some("-- loading --"),
        Paginated::LoadMore(_) => Some("-- loading more --"),
        Paginated::Loaded(_) => None,
    }
}

pub(crate) fn render(view: &FeedViewModel<RemoteNews>) -> Vec<String> {
    if view.rows.is_empty() {
        return vec!["(no news; type `more` to load)".to_string()];
    }
    view.rows
        .iter()
        .enumerate()
        .map(|(index, news)| format_row(index + 1, news))
        .collect()
}

fn format_row(number: usize, news: &RemoteNews) -> String {
    let mut row = format!("#{number:<3}");
    if let Some(stamp) = news.published_at() {
        row.push_str(&format!(" {}", stamp.format(DATE_FORMAT)));
    }
    if let Some(category) = news.category_type.as_deref().filter(|c| !c.is_empty()) {
        row.push_str(&format!(" [{category}]"));
    }
    row.push(' ');
    row.push_str(news.title.as_deref().unwrap_or(UNTITLED));
    row
}

/// Detail block for `open <n>`: title, description, link and title image size.
pub(crate) fn render_detail(news: &RemoteNews, image_size: Option<(u32, u32)>) -> Vec<String> {
    let mut lines = vec![news.title.clone().unwrap_or_else(|| UNTITLED.to_string())];
    if let Some(description) = news.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_string());
    }
    lines.push(match news.detail_url() {
        Some(url) => format!("link: {url}"),
        None => "link: (none)".to_string(),
    });
    lines.push(match image_size {
        Some((width, height)) => format!("image: {width}x{height}"),
        None => "image: (none)".to_string(),
    });
    lines
}
