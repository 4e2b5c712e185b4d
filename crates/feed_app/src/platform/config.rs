use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use feed_engine::FeedConfig;
use feed_logging::feed_info;

pub(crate) const DEFAULT_CONFIG_FILENAME: &str = "feed.ron";

/// First command-line argument, or `feed.ron` in the working directory.
pub(crate) fn config_path(mut args: impl Iterator<Item = String>) -> PathBuf {
    args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}

pub(crate) fn load_config(path: &Path) -> anyhow::Result<FeedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {:?}", path))?;
    let config = parse_config(&content)
        .with_context(|| format!("failed to parse config from {:?}", path))?;
    feed_info!(
        "Loaded config from {:?} (base_url={}, page_size={})",
        path,
        config.base_url,
        config.page_size
    );
    Ok(config)
}

fn parse_config(content: &str) -> anyhow::Result<FeedConfig> {
    let config: FeedConfig = ron::from_str(content)?;
    config.validate()?;
    Ok(config)
}
