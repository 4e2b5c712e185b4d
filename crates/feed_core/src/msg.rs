use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg<T, E> {
    /// Return to the initial page with an empty feed, dropping any in-flight fetch.
    Reset,
    /// Reload from the initial page. Ignored while loading unless `force` is set.
    Refresh { force: bool },
    /// Request the next page (consumer scrolled near the end).
    LoadMore,
    /// A page fetch finished.
    PageLoaded {
        generation: Generation,
        result: Result<Vec<T>, E>,
    },
}
