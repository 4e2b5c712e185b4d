use crate::Paginated;

pub type Page = u32;

/// Identifies one issued fetch. Only the most recent generation may touch state.
pub type Generation = u64;

pub const DEFAULT_INITIAL_PAGE: Page = 1;

/// What happens to the published state when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave `Loading`/`LoadMore` published; the consumer decides what to show.
    #[default]
    Keep,
    /// Publish `Loaded` with the items that were visible before the fetch.
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchKind {
    Refresh,
    LoadMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight<T> {
    pub(crate) generation: Generation,
    pub(crate) kind: FetchKind,
    /// Items visible when the fetch was issued, restored under `FailurePolicy::Settle`.
    pub(crate) previous: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerState<T> {
    initial_page: Page,
    current_page: Page,
    all_loaded: bool,
    feed: Paginated<T>,
    failure_policy: FailurePolicy,
    next_generation: Generation,
    in_flight: Option<InFlight<T>>,
}

impl<T> Default for PagerState<T> {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_PAGE)
    }
}

impl<T> PagerState<T> {
    pub fn new(initial_page: Page) -> Self {
        Self {
            initial_page,
            current_page: initial_page,
            all_loaded: false,
            feed: Paginated::default(),
            failure_policy: FailurePolicy::default(),
            next_generation: 1,
            in_flight: None,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn initial_page(&self) -> Page {
        self.initial_page
    }

    /// Next page a `LoadMore` would request.
    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn all_loaded(&self) -> bool {
        self.all_loaded
    }

    pub fn feed(&self) -> &Paginated<T> {
        &self.feed
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Generation of the fetch whose result would currently be applied.
    pub fn in_flight_generation(&self) -> Option<Generation> {
        self.in_flight.as_ref().map(|flight| flight.generation)
    }

    pub(crate) fn set_feed(&mut self, feed: Paginated<T>) {
        self.feed = feed;
    }

    pub(crate) fn take_feed(&mut self) -> Paginated<T> {
        std::mem::take(&mut self.feed)
    }

    pub(crate) fn rewind(&mut self) {
        self.current_page = self.initial_page;
        self.all_loaded = false;
    }

    pub(crate) fn advance_page(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    pub(crate) fn set_all_loaded(&mut self, all_loaded: bool) {
        self.all_loaded = all_loaded;
    }

    /// Registers a new fetch, returning its generation and the superseded one.
    ///
    /// When nothing is visible (a forced refresh over `Loading`), the items
    /// remembered by the superseded fetch carry over.
    pub(crate) fn begin_fetch(
        &mut self,
        kind: FetchKind,
        visible: Vec<T>,
    ) -> (Generation, Option<Generation>) {
        let generation = self.next_generation;
        self.next_generation += 1;
        let (previous, superseded) = match self.in_flight.take() {
            Some(old) if visible.is_empty() => (old.previous, Some(old.generation)),
            Some(old) => (visible, Some(old.generation)),
            None => (visible, None),
        };
        self.in_flight = Some(InFlight {
            generation,
            kind,
            previous,
        });
        (generation, superseded)
    }

    /// Takes the in-flight record if `generation` is the one being waited on.
    pub(crate) fn finish_fetch(&mut self, generation: Generation) -> Option<InFlight<T>> {
        match &self.in_flight {
            Some(flight) if flight.generation == generation => self.in_flight.take(),
            _ => None,
        }
    }

    pub(crate) fn abandon_fetch(&mut self) -> Option<Generation> {
        self.in_flight.take().map(|flight| flight.generation)
    }
}
