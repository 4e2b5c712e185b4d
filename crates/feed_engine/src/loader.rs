use std::fmt;
use std::sync::{mpsc, Arc};
use std::thread;

use feed_core::{
    update, Effect, FailurePolicy, Generation, Msg, Page, PagerState, Paginated,
    DEFAULT_INITIAL_PAGE,
};
use feed_logging::{feed_debug, feed_warn};
use tokio_util::sync::CancellationToken;

/// Produces one page of items; the loader calls it with the page cursor.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + 'static;
    type Error: Send + 'static;

    async fn fetch_page(&self, page: Page, force: bool) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Receives every failure of the fetch that was current when it failed.
pub trait ErrorSink<E>: Send {
    fn report(&self, error: E);
}

pub struct ChannelErrorSink<E> {
    tx: mpsc::Sender<E>,
}

impl<E> ChannelErrorSink<E> {
    pub fn new(tx: mpsc::Sender<E>) -> Self {
        Self { tx }
    }
}

impl<E: Send> ErrorSink<E> for ChannelErrorSink<E> {
    fn report(&self, error: E) {
        let _ = self.tx.send(error);
    }
}

/// Writes failures to the log and drops them.
pub struct LogErrorSink;

impl<E: fmt::Display> ErrorSink<E> for LogErrorSink {
    fn report(&self, error: E) {
        feed_warn!("page fetch failed: {error}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderSettings {
    pub initial_page: Page,
    pub failure_policy: FailurePolicy,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            initial_page: DEFAULT_INITIAL_PAGE,
            failure_policy: FailurePolicy::default(),
        }
    }
}

enum LoaderCommand<T, E> {
    Dispatch(Msg<T, E>),
    Subscribe(mpsc::Sender<Paginated<T>>),
    Shutdown,
}

/// Handle to a paginated feed.
///
/// The pager state lives on a dedicated driver thread. Commands are applied
/// in the order they are sent, fetches run on the driver's tokio runtime, and
/// every state transition and error is delivered from the driver thread.
/// Dropping the handle stops the driver and cancels any in-flight fetch.
pub struct PaginatedLoader<T, E> {
    cmd_tx: mpsc::Sender<LoaderCommand<T, E>>,
}

impl<T, E> PaginatedLoader<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    pub fn spawn<S>(
        source: S,
        settings: LoaderSettings,
        error_sink: Box<dyn ErrorSink<E>>,
    ) -> std::io::Result<Self>
    where
        S: PageSource<Item = T, Error = E>,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("feed-loader-io")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let driver = Driver {
            source: Arc::new(source),
            state: PagerState::new(settings.initial_page)
                .with_failure_policy(settings.failure_policy),
            subscribers: Vec::new(),
            error_sink,
            in_flight: None,
            cmd_tx: cmd_tx.clone(),
            runtime,
        };

        thread::Builder::new()
            .name("feed-loader".to_string())
            .spawn(move || driver.run(cmd_rx))?;

        Ok(Self { cmd_tx })
    }

    /// Back to the initial page with an empty feed. Never fetches.
    pub fn reset(&self) {
        self.send(LoaderCommand::Dispatch(Msg::Reset));
    }

    /// Reloads the first page, replacing all items. Ignored while loading unless forced.
    pub fn refresh(&self, force: bool) {
        self.send(LoaderCommand::Dispatch(Msg::Refresh { force }));
    }

    /// Appends the next page. Ignored while loading or after a terminal page.
    pub fn load_more(&self) {
        self.send(LoaderCommand::Dispatch(Msg::LoadMore));
    }

    /// Stream of state transitions, starting with the current state.
    pub fn subscribe(&self) -> mpsc::Receiver<Paginated<T>> {
        let (tx, rx) = mpsc::channel();
        self.send(LoaderCommand::Subscribe(tx));
        rx
    }

    fn send(&self, command: LoaderCommand<T, E>) {
        if self.cmd_tx.send(command).is_err() {
            feed_warn!("paginated loader driver is gone; command dropped");
        }
    }
}

impl<T, E> Drop for PaginatedLoader<T, E> {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(LoaderCommand::Shutdown);
    }
}

struct Driver<S: PageSource> {
    source: Arc<S>,
    state: PagerState<S::Item>,
    subscribers: Vec<mpsc::Sender<Paginated<S::Item>>>,
    error_sink: Box<dyn ErrorSink<S::Error>>,
    in_flight: Option<(Generation, CancellationToken)>,
    cmd_tx: mpsc::Sender<LoaderCommand<S::Item, S::Error>>,
    runtime: tokio::runtime::Runtime,
}

impl<S: PageSource> Driver<S> {
    fn run(mut self, cmd_rx: mpsc::Receiver<LoaderCommand<S::Item, S::Error>>) {
        while let Ok(command) = cmd_rx.recv() {
            match command {
                LoaderCommand::Dispatch(msg) => self.dispatch(msg),
                LoaderCommand::Subscribe(tx) => {
                    if tx.send(self.state.feed().clone()).is_ok() {
                        self.subscribers.push(tx);
                    }
                }
                LoaderCommand::Shutdown => break,
            }
        }
        if let Some((_, token)) = self.in_flight.take() {
            token.cancel();
        }
        feed_debug!("paginated loader stopped");
    }

    fn dispatch(&mut self, msg: Msg<S::Item, S::Error>) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect<S::Item, S::Error>) {
        match effect {
            Effect::CancelFetch { generation } => self.cancel(generation),
            Effect::Publish(feed) => {
                self.subscribers.retain(|tx| tx.send(feed.clone()).is_ok());
            }
            Effect::FetchPage {
                generation,
                page,
                force,
            } => self.spawn_fetch(generation, page, force),
            Effect::ReportError(error) => self.error_sink.report(error),
        }
    }

    fn cancel(&mut self, generation: Generation) {
        match self.in_flight.take() {
            Some((current, token)) if current == generation => {
                feed_debug!("cancelling fetch generation {generation}");
                token.cancel();
            }
            other => self.in_flight = other,
        }
    }

    fn spawn_fetch(&mut self, generation: Generation, page: Page, force: bool) {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let source = Arc::clone(&self.source);
        let tx = self.cmd_tx.clone();

        feed_debug!("fetching page {page} (generation {generation}, force {force})");
        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                result = source.fetch_page(page, force) => {
                    let _ = tx.send(LoaderCommand::Dispatch(Msg::PageLoaded { generation, result }));
                }
            }
        });
        self.in_flight = Some((generation, token));
    }
}
