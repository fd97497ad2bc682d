// tests/selection_tests.rs
//
// Выбор карточек биддером: квота, дубликаты, чужие карточки,
// карточки из коллекции (сгорают при выборе).

use outrank_engine::domain::catalog::{Category, Item, Prompt, SortDirection};
use outrank_engine::domain::player::PlayerProfile;
use outrank_engine::domain::rules::RuleConfig;
use outrank_engine::domain::token::Denomination;
use outrank_engine::domain::PlayerId;
use outrank_engine::engine::selection::{pool_covers_bid, SelectionSource, SelectionState};
use outrank_engine::engine::{EngineError, GameSession, Phase, RandomSource, RevealStatus};
use outrank_engine::infra::InMemoryCatalog;

struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn make_catalog() -> InMemoryCatalog {
    let items = ["a", "b", "c", "d", "e", "f", "g", "h"]
        .iter()
        .enumerate()
        .map(|(i, id)| Item::new(*id, id.to_uppercase()).with_attribute("v", (80 - 10 * i) as f64))
        .collect();
    let mut catalog = InMemoryCatalog::new();
    catalog.add_category(Category {
        id: "demo".to_string(),
        name: "Demo".to_string(),
        items,
        prompts: vec![Prompt::new("v", SortDirection::Descending, "v")],
    });
    catalog
}

fn start_and_win(s: &mut GameSession, catalog: &InMemoryCatalog, bidder: PlayerId, bid: u32) {
    s.choose_category(catalog, "demo", &mut DummyRng).unwrap();
    s.draw_pool(catalog, &mut DummyRng).unwrap();
    for _ in 0..bid {
        s.place_bid(bidder).unwrap();
    }
    let others: Vec<PlayerId> = s
        .players()
        .iter()
        .map(|p| p.id)
        .filter(|id| *id != bidder)
        .collect();
    for pid in others {
        s.pass(pid).unwrap();
    }
}

#[test]
fn quota_is_exact() {
    let mut sel = SelectionState::new(2, ids(&["a", "b", "c"]), Vec::new());
    assert_eq!(sel.select("a").unwrap(), SelectionSource::Pool);
    assert_eq!(sel.remaining_quota(), 1);
    assert!(!sel.is_complete());
    sel.select("c").unwrap();
    assert!(sel.is_complete());
    assert_eq!(sel.select("b"), Err(EngineError::SelectionQuotaFilled(2)));
    assert_eq!(sel.selected, ids(&["a", "c"]));
}

#[test]
fn duplicates_and_foreign_items_are_rejected() {
    let mut sel = SelectionState::new(3, ids(&["a", "b"]), ids(&["x"]));
    sel.select("a").unwrap();
    assert_eq!(
        sel.select("a"),
        Err(EngineError::ItemAlreadySelected("a".to_string()))
    );
    assert_eq!(
        sel.select("q"),
        Err(EngineError::ItemNotSelectable("q".to_string()))
    );
    assert_eq!(sel.select("x").unwrap(), SelectionSource::Owned);
    assert!(sel.owned_available.is_empty());
}

#[test]
fn pool_must_cover_bid() {
    assert!(pool_covers_bid(5, 3));
    assert!(pool_covers_bid(3, 3));
    assert!(!pool_covers_bid(4, 5));
}

#[test]
fn only_bidder_selects() {
    let catalog = make_catalog();
    let mut s = GameSession::new(
        1,
        RuleConfig::classic(),
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap();
    start_and_win(&mut s, &catalog, 1, 2);
    s.skip_block(2).unwrap();
    assert_eq!(s.phase(), Phase::Selection);

    assert_eq!(s.select_item(2, "a"), Err(EngineError::NotPlayersTurn(2)));
    s.select_item(1, "a").unwrap();
    assert_eq!(s.phase(), Phase::Selection);
    s.select_item(1, "b").unwrap();
    assert_eq!(s.phase(), Phase::Ranking);
}

#[test]
fn ranking_must_be_permutation_of_selection() {
    let catalog = make_catalog();
    let mut s = GameSession::new(
        1,
        RuleConfig::classic(),
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap();
    start_and_win(&mut s, &catalog, 1, 2);
    s.skip_block(2).unwrap();
    s.select_item(1, "a").unwrap();
    s.select_item(1, "b").unwrap();

    assert_eq!(
        s.submit_ranking(&catalog, ids(&["a"])),
        Err(EngineError::RankingMismatch)
    );
    assert_eq!(
        s.submit_ranking(&catalog, ids(&["a", "a"])),
        Err(EngineError::RankingMismatch)
    );
    assert_eq!(
        s.submit_ranking(&catalog, ids(&["a", "c"])),
        Err(EngineError::RankingMismatch)
    );
    assert_eq!(s.phase(), Phase::Ranking);
    s.submit_ranking(&catalog, ids(&["b", "a"])).unwrap();
    assert_eq!(s.phase(), Phase::Reveal);
}

#[test]
fn owned_item_can_be_selected_once_and_burns() {
    let catalog = make_catalog();
    let mut s = GameSession::new(
        1,
        RuleConfig::token_ownership(),
        vec![
            PlayerProfile::new(1, "A"),
            PlayerProfile::new(2, "B"),
            PlayerProfile::new(3, "C"),
        ],
    )
    .unwrap();

    // Раунд 1: игрок 2 блокирует "a", биддер проваливается → "a" у игрока 2.
    start_and_win(&mut s, &catalog, 1, 2);
    s.spend_block_token(2, Denomination::Two, "a").unwrap();
    s.skip_block(3).unwrap();
    s.select_item(1, "b").unwrap();
    s.select_item(1, "c").unwrap();
    s.submit_ranking(&catalog, ids(&["c", "b"])).unwrap();
    assert_eq!(s.reveal_all().unwrap(), RevealStatus::Failed);
    s.score_round().unwrap();
    assert!(s.ledger().owns(2, "demo", "a"));
    s.advance_round().unwrap();

    // Раунд 2: биддер теперь игрок 2, он берёт "a" из коллекции.
    start_and_win(&mut s, &catalog, 2, 1);
    s.skip_block(1).unwrap();
    s.skip_block(3).unwrap();
    assert_eq!(s.phase(), Phase::Selection);
    let selection = s.round().selection.as_ref().unwrap();
    assert_eq!(selection.owned_available, ids(&["a"]));
    assert!(!selection.available.contains(&"a".to_string()));

    assert_eq!(s.select_item(2, "a").unwrap(), SelectionSource::Owned);
    assert!(!s.ledger().owns(2, "demo", "a"));
    assert_eq!(s.ledger().owned_count(2), 0);

    s.submit_ranking(&catalog, ids(&["a"])).unwrap();
    assert_eq!(s.reveal().unwrap(), RevealStatus::Succeeded);
    s.score_round().unwrap();
    assert!(s.retired_items("demo").contains(&"a".to_string()));
}

#[test]
fn owned_items_stay_hidden_without_permission() {
    let catalog = make_catalog();
    let rules = RuleConfig {
        allow_owned_in_selection: false,
        ..RuleConfig::token_ownership()
    };
    let mut s = GameSession::new(
        1,
        rules,
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap();

    // Раунд 1: провал по нехватке пула, "a" уходит игроку 2.
    start_and_win(&mut s, &catalog, 1, 8);
    s.spend_block_token(2, Denomination::Six, "a").unwrap();
    assert_eq!(s.phase(), Phase::Scoring);
    s.score_round().unwrap();
    assert!(s.ledger().owns(2, "demo", "a"));
    s.advance_round().unwrap();

    start_and_win(&mut s, &catalog, 2, 1);
    s.skip_block(1).unwrap();
    let selection = s.round().selection.as_ref().unwrap();
    assert!(selection.owned_available.is_empty());
    assert_eq!(
        s.select_item(2, "a"),
        Err(EngineError::ItemNotSelectable("a".to_string()))
    );
}

#[test]
fn refreshed_items_return_to_the_deck() {
    let catalog = make_catalog();
    let rules = RuleConfig {
        refresh_used_items: true,
        ..RuleConfig::classic()
    };
    let mut s = GameSession::new(
        1,
        rules,
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap();

    start_and_win(&mut s, &catalog, 1, 2);
    s.skip_block(2).unwrap();
    s.select_item(1, "a").unwrap();
    s.select_item(1, "b").unwrap();
    s.submit_ranking(&catalog, ids(&["a", "b"])).unwrap();
    assert_eq!(s.reveal_all().unwrap(), RevealStatus::Succeeded);
    s.score_round().unwrap();
    assert!(s.retired_items("demo").is_empty());
    s.advance_round().unwrap();

    s.choose_category(&catalog, "demo", &mut DummyRng).unwrap();
    let pool = s.draw_pool(&catalog, &mut DummyRng).unwrap();
    assert!(pool.contains(&"a".to_string()));
    assert!(pool.contains(&"b".to_string()));
}

#[test]
fn owned_item_burns_even_when_deck_refreshes() {
    let catalog = make_catalog();
    let rules = RuleConfig {
        refresh_used_items: true,
        ..RuleConfig::token_ownership()
    };
    let mut s = GameSession::new(
        1,
        rules,
        vec![
            PlayerProfile::new(1, "A"),
            PlayerProfile::new(2, "B"),
            PlayerProfile::new(3, "C"),
        ],
    )
    .unwrap();

    start_and_win(&mut s, &catalog, 1, 2);
    s.spend_block_token(2, Denomination::Two, "a").unwrap();
    s.skip_block(3).unwrap();
    s.select_item(1, "b").unwrap();
    s.select_item(1, "c").unwrap();
    s.submit_ranking(&catalog, ids(&["c", "b"])).unwrap();
    assert_eq!(s.reveal_all().unwrap(), RevealStatus::Failed);
    s.score_round().unwrap();
    assert!(s.ledger().owns(2, "demo", "a"));
    assert!(s.retired_items("demo").is_empty());
    s.advance_round().unwrap();

    start_and_win(&mut s, &catalog, 2, 1);
    assert!(s.round().pool.contains(&"b".to_string()));
    assert!(!s.round().pool.contains(&"a".to_string()));
    s.skip_block(1).unwrap();
    s.skip_block(3).unwrap();

    assert_eq!(s.select_item(2, "a").unwrap(), SelectionSource::Owned);
    assert_eq!(s.retired_items("demo"), ids(&["a"]));

    s.submit_ranking(&catalog, ids(&["a"])).unwrap();
    assert_eq!(s.reveal().unwrap(), RevealStatus::Succeeded);
    s.score_round().unwrap();
    assert_eq!(s.retired_items("demo"), ids(&["a"]));
}
