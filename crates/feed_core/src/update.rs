use crate::state::FetchKind;
use crate::{Effect, FailurePolicy, Generation, Msg, PagerState, Paginated};

/// Pure update function: applies a message to state and returns any effects.
///
/// Effects are ordered; a driver must execute them front to back so that
/// subscribers observe transitions in the order they were published.
pub fn update<T: Clone, E>(
    mut state: PagerState<T>,
    msg: Msg<T, E>,
) -> (PagerState<T>, Vec<Effect<T, E>>) {
    let effects = match msg {
        Msg::Reset => reset(&mut state),
        Msg::Refresh { force } => refresh(&mut state, force),
        Msg::LoadMore => load_more(&mut state),
        Msg::PageLoaded { generation, result } => page_loaded(&mut state, generation, result),
    };

    (state, effects)
}

fn reset<T: Clone, E>(state: &mut PagerState<T>) -> Vec<Effect<T, E>> {
    let mut effects = Vec::with_capacity(2);
    if let Some(generation) = state.abandon_fetch() {
        effects.push(Effect::CancelFetch { generation });
    }
    state.rewind();
    state.set_feed(Paginated::Loaded(Vec::new()));
    effects.push(Effect::Publish(Paginated::Loaded(Vec::new())));
    effects
}

fn refresh<T: Clone, E>(state: &mut PagerState<T>, force: bool) -> Vec<Effect<T, E>> {
    if !force && state.feed().is_loading() {
        return Vec::new();
    }

    state.rewind();
    let visible = state.take_feed().into_items();
    state.set_feed(Paginated::Loading);
    let (generation, superseded) = state.begin_fetch(FetchKind::Refresh, visible);

    let mut effects = Vec::with_capacity(3);
    if let Some(superseded) = superseded {
        effects.push(Effect::CancelFetch {
            generation: superseded,
        });
    }
    effects.push(Effect::Publish(Paginated::Loading));
    effects.push(Effect::FetchPage {
        generation,
        page: state.initial_page(),
        force,
    });
    effects
}

fn load_more<T: Clone, E>(state: &mut PagerState<T>) -> Vec<Effect<T, E>> {
    if state.feed().is_loading() || state.all_loaded() {
        return Vec::new();
    }
    // An empty feed has nothing to append to; start from the first page instead.
    if state.feed().items().is_empty() {
        return refresh(state, false);
    }

    let items = state.take_feed().into_items();
    state.set_feed(Paginated::LoadMore(items.clone()));
    let (generation, superseded) = state.begin_fetch(FetchKind::LoadMore, items.clone());

    let mut effects = Vec::with_capacity(3);
    effects.push(Effect::Publish(Paginated::LoadMore(items)));
    if let Some(superseded) = superseded {
        effects.push(Effect::CancelFetch {
            generation: superseded,
        });
    }
    effects.push(Effect::FetchPage {
        generation,
        page: state.current_page(),
        force: false,
    });
    effects
}

fn page_loaded<T: Clone, E>(
    state: &mut PagerState<T>,
    generation: Generation,
    result: Result<Vec<T>, E>,
) -> Vec<Effect<T, E>> {
    // Results of superseded or abandoned fetches never touch state.
    let Some(flight) = state.finish_fetch(generation) else {
        return Vec::new();
    };

    match result {
        Ok(page) => {
            let next = match flight.kind {
                FetchKind::Refresh => state.take_feed().update_with(page),
                FetchKind::LoadMore => {
                    state.set_all_loaded(page.is_empty());
                    Paginated::Loaded(state.take_feed().into_items()).update_with(page)
                }
            };
            state.advance_page();
            state.set_feed(next.clone());
            vec![Effect::Publish(next)]
        }
        Err(error) => {
            let mut effects = vec![Effect::ReportError(error)];
            if state.failure_policy() == FailurePolicy::Settle {
                let settled = Paginated::Loaded(flight.previous);
                state.set_feed(settled.clone());
                effects.push(Effect::Publish(settled));
            }
            effects
        }
    }
}
