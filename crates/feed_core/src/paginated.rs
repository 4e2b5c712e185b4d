/// Published state of a paginated feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paginated<T> {
    /// Items are available and no fetch is in flight.
    Loaded(Vec<T>),
    /// First page (initial load or refresh) is in flight; nothing is shown yet.
    Loading,
    /// A further page is in flight; the carried items stay visible meanwhile.
    LoadMore(Vec<T>),
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Paginated::Loaded(Vec::new())
    }
}

impl<T> Paginated<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Paginated::Loading | Paginated::LoadMore(_))
    }

    pub fn items(&self) -> &[T] {
        match self {
            Paginated::Loaded(items) | Paginated::LoadMore(items) => items,
            Paginated::Loading => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Paginated::Loaded(items) | Paginated::LoadMore(items) => items,
            Paginated::Loading => Vec::new(),
        }
    }

    /// Folds a fetched page into the state.
    ///
    /// In-flight states are replaced by the page; a settled state appends it.
    pub fn update_with(self, page: Vec<T>) -> Paginated<T> {
        match self {
            Paginated::Loading | Paginated::LoadMore(_) => Paginated::Loaded(page),
            Paginated::Loaded(mut items) => {
                items.extend(page);
                Paginated::Loaded(items)
            }
        }
    }

    pub fn map<U>(&self, transform: impl FnMut(&T) -> U) -> Paginated<U> {
        match self {
            Paginated::Loaded(items) => Paginated::Loaded(items.iter().map(transform).collect()),
            Paginated::LoadMore(items) => {
                Paginated::LoadMore(items.iter().map(transform).collect())
            }
            Paginated::Loading => Paginated::Loading,
        }
    }
}
