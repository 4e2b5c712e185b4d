mod app;
mod commands;
mod config;
mod logging;
mod render;

pub use app::run_app;
