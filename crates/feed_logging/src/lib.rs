#![deny(missing_docs)]
//! Logging macros for the news feed crates.
//!
//! `feed_engine` writes transport traffic, API failures and loader lifecycle
//! through these macros; `feed_app` installs the actual logger (file,
//! terminal or both) at startup. Nothing here picks a backend: the macros go
//! through the `log` facade, so every calling crate depends on `log` too.
//!
//! Level conventions in this workspace:
//! - `error`: failed requests and API errors, logged before they propagate.
//! - `warn`: recoverable failures such as image fetch or decode errors.
//! - `info`: request lines and response bodies, gated by the network log level.
//! - `debug`: fetch scheduling and cancellation in the paginated loader.
//! - `trace`: image cache hits.

/// Trace-level message; the image cache reports hits at this level.
#[macro_export]
macro_rules! feed_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Debug-level message, e.g. which page and generation a fetch is for.
#[macro_export]
macro_rules! feed_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Info-level message.
#[macro_export]
macro_rules! feed_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Warn-level message for failures that degrade instead of propagating.
#[macro_export]
macro_rules! feed_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Error-level message for failures surfaced to a caller or error sink.
#[macro_export]
macro_rules! feed_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Installs a terminal logger for test binaries.
///
/// Debug level in debug builds, info otherwise. Returns quietly when the
/// binary already has a logger, so every test can call it through a `Once`.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
