use crate::{Generation, Page, Paginated};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect<T, E> {
    /// Abort the fetch issued under `generation`; its result will be ignored anyway.
    CancelFetch { generation: Generation },
    /// Deliver a new feed state to subscribers.
    Publish(Paginated<T>),
    /// Start fetching `page`; the result must come back as `Msg::PageLoaded`.
    FetchPage {
        generation: Generation,
        page: Page,
        force: bool,
    },
    /// Hand a fetch failure to the error sink.
    ReportError(E),
}
