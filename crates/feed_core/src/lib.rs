//! Feed core: pure pagination state machine and view-model helpers.
mod effect;
mod msg;
mod paginated;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use paginated::Paginated;
pub use state::{FailurePolicy, Generation, Page, PagerState, DEFAULT_INITIAL_PAGE};
pub use update::update;
pub use view_model::{FeedViewModel, Identified};
