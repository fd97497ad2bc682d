// tests/bidding_tests.rs
//
// Торги: ставка ровно +1, потолок, пасы, сброс при всеобщем пасе.

use outrank_engine::domain::catalog::{Category, Item, Prompt, SortDirection};
use outrank_engine::domain::player::PlayerProfile;
use outrank_engine::domain::rules::RuleConfig;
use outrank_engine::engine::bidding::{BidOutcome, BiddingState, BiddingStatus, PassOutcome};
use outrank_engine::engine::{EngineError, GameSession, Phase, RandomSource, RoundEventKind};
use outrank_engine::infra::InMemoryCatalog;

struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn open_bidding(max_bid: u32, players: &[u64]) -> BiddingState {
    let mut b = BiddingState::new(max_bid);
    b.open(players.to_vec());
    b
}

fn make_catalog() -> InMemoryCatalog {
    let items = (0..5)
        .map(|i| Item::new(format!("i{i}"), format!("Item {i}")).with_attribute("v", i as f64))
        .collect();
    let mut catalog = InMemoryCatalog::new();
    catalog.add_category(Category {
        id: "demo".to_string(),
        name: "Demo".to_string(),
        items,
        prompts: vec![Prompt::new("v", SortDirection::Ascending, "v")],
    });
    catalog
}

#[test]
fn bid_must_be_exactly_one_more() {
    let mut b = open_bidding(10, &[1, 2, 3]);

    assert_eq!(
        b.bid(1, 2),
        Err(EngineError::BidOutOfSequence { expected: 1, got: 2 })
    );
    b.bid(1, 1).unwrap();
    assert_eq!(
        b.bid(2, 1),
        Err(EngineError::BidOutOfSequence { expected: 2, got: 1 })
    );
    b.bid(2, 2).unwrap();
    assert_eq!(b.current_bid, 2);
    assert_eq!(b.high_bidder, Some(2));
}

#[test]
fn bid_above_ceiling_is_rejected() {
    let mut b = open_bidding(2, &[1, 2]);
    b.bid(1, 1).unwrap();
    b.bid(2, 2).unwrap();
    assert_eq!(b.bid(1, 3), Err(EngineError::BidAboveMax { bid: 3, max: 2 }));
    assert_eq!(b.current_bid, 2);
}

#[test]
fn high_bidder_may_raise_own_bid() {
    let mut b = open_bidding(10, &[1, 2]);
    b.bid(1, 1).unwrap();
    b.bid(1, 2).unwrap();
    assert_eq!(b.current_bid, 2);
    assert_eq!(b.high_bidder, Some(1));
}

#[test]
fn high_bidder_cannot_pass() {
    let mut b = open_bidding(10, &[1, 2, 3]);
    b.bid(2, 1).unwrap();
    assert_eq!(b.pass(2), Err(EngineError::HighBidderCannotPass(2)));
    assert!(b.passed.is_empty());
}

#[test]
fn passed_player_cannot_bid_or_pass_again() {
    let mut b = open_bidding(10, &[1, 2, 3]);
    b.bid(1, 1).unwrap();
    assert_eq!(b.pass(2).unwrap(), PassOutcome::Continue);

    assert_eq!(b.bid(2, 2), Err(EngineError::PlayerAlreadyPassed(2)));
    assert_eq!(b.pass(2), Err(EngineError::PlayerAlreadyPassed(2)));
}

#[test]
fn everyone_passing_without_bid_restarts() {
    let mut b = open_bidding(10, &[1, 2, 3]);
    assert_eq!(b.pass(1).unwrap(), PassOutcome::Continue);
    assert_eq!(b.pass(2).unwrap(), PassOutcome::Continue);

    // Один активный и нет ставки: торги открыты, он должен решить.
    assert_eq!(b.status, BiddingStatus::Open);
    assert_eq!(b.active_players(), vec![3]);

    assert_eq!(b.pass(3).unwrap(), PassOutcome::Restarted);
    assert!(b.passed.is_empty());
    assert_eq!(b.status, BiddingStatus::Open);
    assert_eq!(b.current_bid, 0);
}

#[test]
fn last_active_player_bid_wins_immediately() {
    let mut b = open_bidding(10, &[1, 2, 3]);
    assert_eq!(b.pass(1).unwrap(), PassOutcome::Continue);
    assert_eq!(b.bid(2, 1).unwrap(), BidOutcome::Continue);
    assert_eq!(b.pass(3).unwrap(), PassOutcome::Resolved { bidder: 2, amount: 1 });

    let mut b = open_bidding(10, &[1, 2, 3]);
    b.pass(1).unwrap();
    b.pass(2).unwrap();
    assert_eq!(
        b.bid(3, 1).unwrap(),
        BidOutcome::Resolved { bidder: 3, amount: 1 }
    );
    assert!(b.is_resolved());
    assert_eq!(b.winner(), Some((3, 1)));
    assert_eq!(b.bid(3, 2), Err(EngineError::BiddingClosed));
}

#[test]
fn resolved_bidding_accepts_nothing() {
    let mut b = open_bidding(10, &[1, 2]);
    b.bid(1, 1).unwrap();
    assert_eq!(
        b.pass(2).unwrap(),
        PassOutcome::Resolved { bidder: 1, amount: 1 }
    );
    assert!(b.is_resolved());
    assert_eq!(b.bid(1, 2), Err(EngineError::BiddingClosed));
    assert_eq!(b.pass(1), Err(EngineError::BiddingClosed));
}

#[test]
fn idle_bidding_is_closed() {
    let mut b = BiddingState::new(10);
    assert_eq!(b.bid(1, 1), Err(EngineError::BiddingClosed));
}

#[test]
fn stranger_cannot_bid() {
    let mut b = open_bidding(10, &[1, 2]);
    assert_eq!(b.bid(9, 1), Err(EngineError::UnknownPlayer(9)));
}

#[test]
fn session_rejects_bid_outside_bidding_phase_without_changes() {
    let catalog = make_catalog();
    let mut s = GameSession::new(
        1,
        RuleConfig::classic(),
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap();

    let before = s.clone();
    let err = s.place_bid(1).unwrap_err();
    assert_eq!(err.code(), "wrong_phase");
    assert_eq!(s, before);

    s.choose_category(&catalog, "demo", &mut DummyRng).unwrap();
    s.draw_pool(&catalog, &mut DummyRng).unwrap();
    assert_eq!(s.phase(), Phase::Bidding);

    assert_eq!(s.place_bid(1).unwrap(), 1);
    assert_eq!(s.place_bid(2).unwrap(), 2);
    assert_eq!(s.stats().get(1).bid_attempts, 1);

    let before = s.clone();
    assert_eq!(s.pass(2), Err(EngineError::HighBidderCannotPass(2)));
    assert_eq!(s, before);

    s.pass(1).unwrap();
    assert_eq!(s.bidder(), Some(2));
    assert_eq!(s.current_bid(), 2);
    assert_eq!(s.stats().get(1).bids_passed, 1);
}

#[test]
fn session_moves_on_when_last_active_player_bids() {
    let catalog = make_catalog();
    let mut s = GameSession::new(
        1,
        RuleConfig::classic(),
        vec![PlayerProfile::new(1, "A"), PlayerProfile::new(2, "B")],
    )
    .unwrap();
    s.choose_category(&catalog, "demo", &mut DummyRng).unwrap();
    s.draw_pool(&catalog, &mut DummyRng).unwrap();

    assert_eq!(s.pass(1).unwrap(), PassOutcome::Continue);
    assert_eq!(s.place_bid(2).unwrap(), 1);

    assert_eq!(s.phase(), Phase::Blocking);
    assert_eq!(s.bidder(), Some(2));
    assert_eq!(s.current_bid(), 1);
    assert_eq!(s.current_blocker(), Some(1));
    assert!(s
        .history()
        .events
        .iter()
        .any(|e| e.kind == RoundEventKind::BiddingResolved { bidder: 2, amount: 1 }));
}
