use std::sync::Once;

use feed_core::{update, Effect, Generation, Msg, PagerState, Paginated};
use pretty_assertions::assert_eq;

type State = PagerState<u32>;
type Effects = Vec<Effect<u32, String>>;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feed_logging::initialize_for_tests);
}

fn step(state: State, msg: Msg<u32, String>) -> (State, Effects) {
    update(state, msg)
}

fn fetch_of(effects: &Effects) -> (Generation, u32) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPage {
                generation, page, ..
            } => Some((*generation, *page)),
            _ => None,
        })
        .expect("fetch effect")
}

fn deliver(state: State, generation: Generation, items: Vec<u32>) -> (State, Effects) {
    step(
        state,
        Msg::PageLoaded {
            generation,
            result: Ok(items),
        },
    )
}

#[test]
fn starts_settled_and_empty() {
    init_logging();
    let state = State::default();
    assert_eq!(state.feed(), &Paginated::Loaded(Vec::new()));
    assert_eq!(state.current_page(), 1);
    assert!(!state.all_loaded());
    assert_eq!(state.in_flight_generation(), None);
}

#[test]
fn load_more_on_empty_feed_refreshes_then_terminal_page_stops_paging() {
    init_logging();
    let first_page: Vec<u32> = (1..=15).collect();

    let (state, effects) = step(State::default(), Msg::LoadMore);
    assert_eq!(
        effects,
        vec![
            Effect::Publish(Paginated::Loading),
            Effect::FetchPage {
                generation: 1,
                page: 1,
                force: false,
            },
        ]
    );

    let (state, effects) = deliver(state, 1, first_page.clone());
    assert_eq!(effects, vec![Effect::Publish(Paginated::Loaded(first_page.clone()))]);
    assert_eq!(state.current_page(), 2);

    let (state, effects) = step(state, Msg::LoadMore);
    assert_eq!(
        effects,
        vec![
            Effect::Publish(Paginated::LoadMore(first_page.clone())),
            Effect::FetchPage {
                generation: 2,
                page: 2,
                force: false,
            },
        ]
    );

    let (state, effects) = deliver(state, 2, Vec::new());
    assert_eq!(effects, vec![Effect::Publish(Paginated::Loaded(first_page.clone()))]);
    assert!(state.all_loaded());
    assert_eq!(state.current_page(), 3);

    let (state, effects) = step(state, Msg::LoadMore);
    assert!(effects.is_empty());
    assert_eq!(state.feed(), &Paginated::Loaded(first_page));
}

#[test]
fn load_more_accumulates_pages_in_request_order() {
    init_logging();
    let (mut state, effects) = step(State::default(), Msg::LoadMore);
    let (generation, _) = fetch_of(&effects);
    state = deliver(state, generation, vec![1, 2, 3]).0;

    let mut expected = vec![1, 2, 3];
    for (page, items) in [(2, vec![4, 5]), (3, vec![6]), (4, vec![7, 8, 9])] {
        let (next, effects) = step(state, Msg::LoadMore);
        let (generation, requested) = fetch_of(&effects);
        assert_eq!(requested, page);
        expected.extend(items.iter().copied());
        state = deliver(next, generation, items).0;
    }

    assert_eq!(state.feed(), &Paginated::Loaded(expected));
    assert_eq!(state.current_page(), 5);
    assert!(!state.all_loaded());
}

#[test]
fn refresh_replaces_accumulated_items() {
    init_logging();
    let (state, effects) = step(State::default(), Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, vec![1, 2]).0;
    let (state, effects) = step(state, Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, vec![3, 4]).0;
    assert_eq!(state.current_page(), 3);

    let (state, effects) = step(state, Msg::Refresh { force: false });
    let (generation, page) = fetch_of(&effects);
    assert_eq!(page, 1);
    assert_eq!(state.feed(), &Paginated::Loading);
    assert_eq!(state.current_page(), 1);

    let (state, _) = deliver(state, generation, vec![10, 11]);
    assert_eq!(state.feed(), &Paginated::Loaded(vec![10, 11]));
    assert_eq!(state.current_page(), 2);
}

#[test]
fn refresh_while_loading_is_noop_unless_forced() {
    init_logging();
    let (state, _) = step(State::default(), Msg::Refresh { force: false });
    let before = state.clone();

    let (state, effects) = step(state, Msg::Refresh { force: false });
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (state, effects) = step(state, Msg::Refresh { force: true });
    assert_eq!(
        effects,
        vec![
            Effect::CancelFetch { generation: 1 },
            Effect::Publish(Paginated::Loading),
            Effect::FetchPage {
                generation: 2,
                page: 1,
                force: true,
            },
        ]
    );
    assert_eq!(state.in_flight_generation(), Some(2));
}

#[test]
fn load_more_while_in_flight_issues_nothing() {
    init_logging();
    let (state, effects) = step(State::default(), Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, vec![1]).0;

    let (state, effects) = step(state, Msg::LoadMore);
    assert_eq!(effects.len(), 2);
    let (state, effects) = step(state, Msg::LoadMore);
    assert!(effects.is_empty());
    let (_state, effects) = step(state, Msg::Refresh { force: false });
    assert!(effects.is_empty());
}

#[test]
fn reset_rewinds_without_fetching() {
    init_logging();
    let (state, effects) = step(State::default(), Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, vec![1, 2]).0;
    let (state, effects) = step(state, Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, Vec::new()).0;
    assert!(state.all_loaded());

    let (state, effects) = step(state, Msg::Reset);
    assert_eq!(effects, vec![Effect::Publish(Paginated::Loaded(Vec::new()))]);
    assert_eq!(state.current_page(), 1);
    assert!(!state.all_loaded());

    // Paging works again after a reset.
    let (_state, effects) = step(state, Msg::LoadMore);
    assert_eq!(fetch_of(&effects).1, 1);
}

#[test]
fn forced_refresh_clears_all_loaded() {
    init_logging();
    let (state, effects) = step(State::default(), Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, vec![1]).0;
    let (state, effects) = step(state, Msg::LoadMore);
    let state = deliver(state, fetch_of(&effects).0, Vec::new()).0;
    assert!(state.all_loaded());

    let (state, effects) = step(state, Msg::Refresh { force: true });
    assert!(!state.all_loaded());
    let state = deliver(state, fetch_of(&effects).0, vec![5]).0;

    let (_state, effects) = step(state, Msg::LoadMore);
    assert_eq!(fetch_of(&effects).1, 2);
}

#[test]
fn custom_initial_page_is_the_reset_anchor() {
    init_logging();
    let (state, effects) = step(State::new(0), Msg::LoadMore);
    assert_eq!(fetch_of(&effects).1, 0);
    let state = deliver(state, fetch_of(&effects).0, vec![1]).0;
    assert_eq!(state.current_page(), 1);

    let (state, _) = step(state, Msg::Reset);
    assert_eq!(state.current_page(), 0);
    assert_eq!(state.initial_page(), 0);
}
