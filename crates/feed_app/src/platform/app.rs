use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use anyhow::Context;
use feed_core::FeedViewModel;
use feed_engine::{
    ApiError, ChannelErrorSink, Paginated, PaginatedLoader, RemoteNews, Services,
};
use feed_logging::{feed_info, feed_warn};

use super::commands::{self, Command};
use super::config;
use super::logging::{self, LogDestination};
use super::render;

type SharedView = Arc<Mutex<Option<FeedViewModel<RemoteNews>>>>;

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::from_env());

    let path = config::config_path(std::env::args().skip(1));
    let config = config::load_config(&path)?;
    let services = Services::from_config(&config).context("failed to set up services")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("feed-app-images")
        .enable_all()
        .build()
        .context("failed to start image runtime")?;

    let (err_tx, err_rx) = mpsc::channel::<ApiError>();
    let loader = services
        .news_loader(Box::new(ChannelErrorSink::new(err_tx)))
        .context("failed to start news loader")?;

    let shown: SharedView = Arc::new(Mutex::new(None));
    spawn_renderer(loader.subscribe(), Arc::clone(&shown));
    spawn_error_printer(err_rx);

    println!("{}", commands::HELP);
    loader.load_more();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        match commands::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(command, &loader, &services, &runtime, &shown),
            Err(commands::ParseError::Empty) => {}
            Err(err) => println!("{err}"),
        }
    }

    feed_info!("Shutting down");
    Ok(())
}

fn execute(
    command: Command,
    loader: &PaginatedLoader<RemoteNews, ApiError>,
    services: &Services,
    runtime: &tokio::runtime::Runtime,
    shown: &SharedView,
) {
    match command {
        Command::LoadMore => loader.load_more(),
        Command::Refresh { force } => loader.refresh(force),
        Command::Reset => loader.reset(),
        Command::Open(row) => {
            let news = match shown.lock() {
                Ok(guard) => guard
                    .as_ref()
                    .and_then(|view| view.rows.get(row - 1).cloned()),
                Err(_) => None,
            };
            let Some(news) = news else {
                println!("no row #{row}");
                return;
            };
            let image = runtime.block_on(services.images.load(news.title_image_url.as_deref()));
            let size = image.map(|image| (image.width(), image.height()));
            print_lines(&render::render_detail(&news, size));
        }
        Command::Help => println!("{}", commands::HELP),
        Command::Quit => {}
    }
}

/// Prints settled feeds that differ from what is on screen, plus loading markers.
fn spawn_renderer(states: mpsc::Receiver<Paginated<RemoteNews>>, shown: SharedView) {
    thread::spawn(move || {
        for state in states {
            if let Some(marker) = render::loading_marker(&state) {
                println!("{marker}");
                continue;
            }
            let Some(view) = FeedViewModel::settled(&state) else {
                continue;
            };
            let Ok(mut guard) = shown.lock() else {
                feed_warn!("render state poisoned; renderer stopping");
                return;
            };
            if view.differs_from(guard.as_ref()) {
                print_lines(&render::render(&view));
                *guard = Some(view);
            }
        }
    });
}

fn spawn_error_printer(errors: mpsc::Receiver<ApiError>) {
    thread::spawn(move || {
        for err in errors {
            match err.status_code() {
                Some(code) => println!("error (HTTP {code}): {err}"),
                None => println!("error: {err}"),
            }
        }
    });
}

fn print_lines(lines: &[String]) {
    let mut out = io::stdout().lock();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = out.flush();
}
