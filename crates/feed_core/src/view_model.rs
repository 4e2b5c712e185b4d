use std::collections::HashSet;
use std::hash::Hash;

use crate::Paginated;

/// Row capability consumed by list front ends: a stable identity plus equality.
pub trait Identified: PartialEq {
    type Id: Eq + Hash + Clone;

    fn identity(&self) -> Self::Id;
}

/// Rows ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedViewModel<R> {
    pub rows: Vec<R>,
}

impl<R: Identified + Clone> FeedViewModel<R> {
    /// Builds rows from a settled state; in-flight states yield `None` so the
    /// previous rows stay on screen until the fetch lands.
    pub fn settled(state: &Paginated<R>) -> Option<Self> {
        if state.is_loading() {
            return None;
        }
        Some(Self::from_rows(state.items()))
    }

    /// Keeps the first occurrence of every identity. Pages can overlap when
    /// items are published between page requests.
    pub fn from_rows(rows: &[R]) -> Self {
        let mut seen = HashSet::with_capacity(rows.len());
        let rows = rows
            .iter()
            .filter(|row| seen.insert(row.identity()))
            .cloned()
            .collect();
        Self { rows }
    }

    /// True when rendering `self` over `previous` would change anything.
    pub fn differs_from(&self, previous: Option<&Self>) -> bool {
        previous.map_or(true, |previous| previous != self)
    }

    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.rows.iter().find(|row| &row.identity() == id)
    }
}
