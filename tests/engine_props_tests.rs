// tests/engine_props_tests.rs
//
// Свойства движка на случайных партиях:
// - токены сохраняются после каждого шага;
// - Σ bids_won == число сыгранных раундов;
// - ставка растёт ровно на 1 и не уходит за потолок;
// - вскрытие детерминировано и идемпотентно.

use proptest::prelude::*;

use outrank_engine::domain::catalog::{Category, Item, Prompt, SortDirection};
use outrank_engine::domain::player::PlayerProfile;
use outrank_engine::domain::rules::RuleConfig;
use outrank_engine::domain::token::Denomination;
use outrank_engine::domain::PlayerId;
use outrank_engine::engine::bidding::BiddingState;
use outrank_engine::engine::reveal::{find_sequence_break, RankedItem};
use outrank_engine::engine::{GameSession, Phase, RevealStatus, RevealValidator};
use outrank_engine::infra::catalog::CatalogAdapter;
use outrank_engine::infra::{DeterministicRng, InMemoryCatalog};

const PRESETS: [&str; 4] = ["classic", "token-ownership", "high-stakes", "experimental"];

fn make_catalog() -> InMemoryCatalog {
    // Значения с повторами, чтобы в ранжированиях встречались равенства.
    let items = (0..30)
        .map(|i| Item::new(format!("i{i}"), format!("Item {i}")).with_attribute("v", (i * 7 % 13) as f64))
        .collect();
    let mut catalog = InMemoryCatalog::new();
    catalog.add_category(Category {
        id: "cat".to_string(),
        name: "Cat".to_string(),
        items,
        prompts: vec![
            Prompt::new("v", SortDirection::Descending, "v desc"),
            Prompt::new("v", SortDirection::Ascending, "v asc"),
        ],
    });
    catalog
}

/// Поток решений бота: циклически по сгенерированным байтам.
struct Choices {
    bytes: Vec<u8>,
    cursor: usize,
}

impl Choices {
    fn next(&mut self, bound: usize) -> usize {
        let b = self.bytes[self.cursor % self.bytes.len()] as usize;
        self.cursor += 1;
        b % bound.max(1)
    }
}

/// Один шаг партии от лица того, чей сейчас ход.
fn step(
    s: &mut GameSession,
    catalog: &InMemoryCatalog,
    rng: &mut DeterministicRng,
    choices: &mut Choices,
) {
    match s.phase() {
        Phase::CategoryChoice => {
            s.choose_category(catalog, "cat", rng).unwrap();
        }
        Phase::Drawing => {
            s.draw_pool(catalog, rng).unwrap();
        }
        Phase::Bidding => {
            let bidding = &s.round().bidding;
            let active = bidding.active_players();
            let actor = active[choices.next(active.len())];
            let can_bid = bidding.current_bid < bidding.max_bid;
            let is_high = bidding.high_bidder == Some(actor);
            let must_bid = bidding.current_bid == 0 && actor == s.players()[0].id;

            if must_bid || (can_bid && choices.next(3) == 0) {
                s.place_bid(actor).unwrap();
            } else if !is_high {
                s.pass(actor).unwrap();
            } else if let Some(other) = active.iter().copied().find(|p| *p != actor) {
                s.pass(other).unwrap();
            }
        }
        Phase::Blocking => {
            let blocker = s.current_blocker().unwrap();
            let open: Vec<String> = s.round().available_items();
            let tokens: Vec<Denomination> = Denomination::ALL
                .into_iter()
                .filter(|d| s.token_count(blocker, *d) > 0)
                .collect();

            if open.is_empty() || tokens.is_empty() || choices.next(2) == 0 {
                s.skip_block(blocker).unwrap();
            } else {
                let item = open[choices.next(open.len())].clone();
                let denomination = tokens[choices.next(tokens.len())];
                s.spend_block_token(blocker, denomination, &item).unwrap();
            }
        }
        Phase::Selection => {
            let bidder = s.bidder().unwrap();
            let selection = s.round().selection.as_ref().unwrap();
            let candidates: Vec<String> = selection
                .available
                .iter()
                .chain(selection.owned_available.iter())
                .filter(|id| !selection.selected.contains(*id))
                .cloned()
                .collect();
            let item = candidates[choices.next(candidates.len())].clone();
            s.select_item(bidder, &item).unwrap();
        }
        Phase::Ranking => {
            let prompt = s.round().prompt.clone().unwrap();
            let mut ranking = s.round().selection.as_ref().unwrap().selected.clone();
            if choices.next(2) == 0 {
                ranking.sort_by(|a, b| {
                    let va = catalog.attribute(a, &prompt.attribute).unwrap();
                    let vb = catalog.attribute(b, &prompt.attribute).unwrap();
                    match prompt.direction {
                        SortDirection::Descending => vb.total_cmp(&va),
                        SortDirection::Ascending => va.total_cmp(&vb),
                    }
                });
            } else {
                let shift = choices.next(ranking.len());
                ranking.rotate_left(shift);
            }
            s.submit_ranking(catalog, ranking).unwrap();
        }
        Phase::Reveal => {
            s.reveal().unwrap();
        }
        Phase::Scoring => {
            s.score_round().unwrap();
        }
        Phase::RoundComplete => {
            s.advance_round().unwrap();
        }
        Phase::GameOver => {}
    }
}

fn make_session(preset: &str, players: usize) -> GameSession {
    let profiles = (1..=players as PlayerId)
        .map(|id| PlayerProfile::new(id, format!("P{id}")))
        .collect();
    GameSession::new(1, RuleConfig::preset(preset).unwrap(), profiles).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Свойство: токены не появляются и не исчезают ни на одном шаге,
    /// а каждый сыгранный раунд даёт ровно одну выигранную ставку.
    #[test]
    fn prop_random_games_conserve_tokens(
        seed in any::<u64>(),
        preset in 0usize..PRESETS.len(),
        players in 2usize..=5,
        bytes in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let catalog = make_catalog();
        let mut rng = DeterministicRng::from_seed(seed);
        let mut choices = Choices { bytes, cursor: 0 };
        let mut s = make_session(PRESETS[preset], players);

        let mut steps = 0;
        while s.phase() != Phase::GameOver {
            step(&mut s, &catalog, &mut rng, &mut choices);
            prop_assert!(s.ledger().verify_conservation().is_ok());
            steps += 1;
            prop_assert!(steps < 10_000, "партия не закончилась");
        }

        prop_assert!(s.round_number() <= s.rules().max_rounds);
        prop_assert_eq!(s.stats().total_bids_won() as usize, s.records().len());
        prop_assert_eq!(s.records().len() as u32, s.round_number());

        for winner in s.winners() {
            prop_assert!(s.score(winner).unwrap() >= s.rules().winning_score);
        }
    }

    /// Свойство: принятая ставка всегда ровно текущая + 1 и не выше потолка.
    #[test]
    fn prop_bids_increase_by_one(
        max_bid in 1u32..=15,
        attempts in prop::collection::vec((0u64..4, 0u32..20), 1..60),
    ) {
        let mut b = BiddingState::new(max_bid);
        b.open(vec![0, 1, 2, 3]);

        for (player, amount) in attempts {
            let before = b.current_bid;
            match b.bid(player, amount) {
                Ok(_) => {
                    prop_assert_eq!(amount, before + 1);
                    prop_assert!(amount <= max_bid);
                    prop_assert_eq!(b.high_bidder, Some(player));
                }
                Err(_) => {
                    prop_assert_eq!(b.current_bid, before);
                }
            }
        }
    }

    /// Свойство: вскрытие детерминировано, совпадает с поиском разрыва
    /// и не меняется после терминального состояния.
    #[test]
    fn prop_reveal_is_deterministic(
        values in prop::collection::vec(0u8..10, 1..12),
        descending in any::<bool>(),
    ) {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let ranking: Vec<RankedItem> = values
            .iter()
            .enumerate()
            .map(|(i, v)| RankedItem { item_id: format!("i{i}"), value: *v as f64 })
            .collect();

        let mut first = RevealValidator::new(ranking.clone(), direction);
        let mut second = RevealValidator::new(ranking, direction);
        let status = first.reveal_all();
        prop_assert_eq!(status, second.reveal_all());
        prop_assert_eq!(&first, &second);

        let as_f64: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        let expected_break = find_sequence_break(&as_f64, direction);
        prop_assert_eq!(first.break_index, expected_break);
        prop_assert_eq!(status == RevealStatus::Succeeded, expected_break.is_none());

        let snapshot = first.clone();
        prop_assert_eq!(first.reveal(), status);
        prop_assert_eq!(first, snapshot);
    }
}
