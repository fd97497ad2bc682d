// tests/actions_tests.rs
//
// Единая точка входа `apply_action`, замена задания и журнал событий.

use outrank_engine::domain::catalog::{Category, Item, Prompt, SortDirection};
use outrank_engine::domain::player::PlayerProfile;
use outrank_engine::domain::rules::RuleConfig;
use outrank_engine::domain::token::Denomination;
use outrank_engine::engine::{
    EngineError, GameSession, Phase, PlayerAction, PlayerActionKind, RandomSource, RoundEventKind,
};
use outrank_engine::infra::InMemoryCatalog;

struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn make_catalog() -> InMemoryCatalog {
    let items = ["a", "b", "c", "d"]
        .iter()
        .enumerate()
        .map(|(i, id)| Item::new(*id, id.to_uppercase()).with_attribute("v", i as f64))
        .collect();
    let mut catalog = InMemoryCatalog::new();
    catalog.add_category(Category {
        id: "demo".to_string(),
        name: "Demo".to_string(),
        items,
        prompts: vec![
            Prompt::new("v", SortDirection::Descending, "v desc"),
            Prompt::new("v", SortDirection::Ascending, "v asc"),
        ],
    });
    catalog
}

fn make_session() -> GameSession {
    GameSession::new(
        1,
        RuleConfig::classic(),
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap()
}

#[test]
fn actions_drive_bidding_blocking_and_selection() {
    let catalog = make_catalog();
    let mut s = make_session();
    s.choose_category(&catalog, "demo", &mut DummyRng).unwrap();
    s.draw_pool(&catalog, &mut DummyRng).unwrap();

    s.apply_action(PlayerAction::new(2, PlayerActionKind::Bid)).unwrap();
    s.apply_action(PlayerAction::new(2, PlayerActionKind::Bid)).unwrap();
    s.apply_action(PlayerAction::new(1, PlayerActionKind::Pass)).unwrap();
    assert_eq!(s.phase(), Phase::Blocking);

    s.apply_action(PlayerAction::new(
        1,
        PlayerActionKind::Block {
            denomination: Denomination::Two,
            item_id: "d".into(),
        },
    ))
    .unwrap();
    assert_eq!(s.phase(), Phase::Selection);

    s.apply_action(PlayerAction::new(2, PlayerActionKind::SelectItem("a".into())))
        .unwrap();
    s.apply_action(PlayerAction::new(2, PlayerActionKind::SelectItem("b".into())))
        .unwrap();
    assert_eq!(s.phase(), Phase::Ranking);
}

#[test]
fn action_in_wrong_phase_is_rejected_unchanged() {
    let mut s = make_session();
    let before = s.clone();

    let err = s
        .apply_action(PlayerAction::new(1, PlayerActionKind::SkipBlock))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::WrongPhase {
            expected: "Blocking",
            ..
        }
    ));
    assert_eq!(s, before);
}

#[test]
fn prompt_can_be_replaced_before_draw_only() {
    let catalog = make_catalog();
    let mut s = make_session();

    let chosen = s.choose_category(&catalog, "demo", &mut DummyRng).unwrap();
    assert_eq!(chosen.direction, SortDirection::Descending);

    let ascending = Prompt::new("v", SortDirection::Ascending, "v asc");
    s.set_prompt(&catalog, ascending.clone()).unwrap();
    assert_eq!(s.round().prompt, Some(ascending.clone()));

    let foreign = Prompt::new("weight", SortDirection::Ascending, "w");
    assert_eq!(
        s.set_prompt(&catalog, foreign),
        Err(EngineError::UnknownPrompt("demo".to_string()))
    );

    s.draw_pool(&catalog, &mut DummyRng).unwrap();
    assert!(s.set_prompt(&catalog, ascending).is_err());
}

#[test]
fn history_records_round_in_order() {
    let catalog = make_catalog();
    let mut s = make_session();
    s.choose_category(&catalog, "demo", &mut DummyRng).unwrap();
    s.draw_pool(&catalog, &mut DummyRng).unwrap();
    s.place_bid(1).unwrap();
    s.pass(2).unwrap();

    let kinds: Vec<&RoundEventKind> = s.history().events.iter().map(|e| &e.kind).collect();
    assert!(matches!(kinds[0], RoundEventKind::RoundStarted { round: 1, .. }));
    assert!(kinds
        .iter()
        .any(|k| matches!(k, RoundEventKind::BiddingResolved { bidder: 1, amount: 1 })));

    let indices: Vec<u32> = s.history().events.iter().map(|e| e.index).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);
}
