//! Игровой движок: торги, блокировка, выбор, вскрытие, скоринг.
//!
//! Высокоуровневый объект: `GameSession`
//! Основные операции:
//!   - `choose_category` / `draw_pool`: начать раунд
//!   - `place_bid` / `pass`, `spend_block_token` / `skip_block`, `select_item`
//!   - `submit_ranking` + `reveal`: проверить порядок биддера
//!   - `score_round` / `advance_round`: очки и переход к следующему раунду

pub mod actions;
pub mod bidding;
pub mod blocking;
pub mod errors;
pub mod history;
pub mod ledger;
pub mod phase;
pub mod reveal;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod stats;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind};
pub use bidding::{BidOutcome, BiddingState, BiddingStatus, PassOutcome};
pub use blocking::BlockingState;
pub use errors::{EngineError, ErrorKind};
pub use history::{RoundEvent, RoundEventKind, RoundHistory};
pub use ledger::TokenLedger;
pub use phase::Phase;
pub use reveal::{RevealMark, RevealStatus, RevealValidator};
pub use scoring::ScoringReport;
pub use selection::{SelectionSource, SelectionState};
pub use session::{GameSession, RoundState};
pub use stats::StatisticsTracker;

/// RNG интерфейс для engine.
/// Реализации в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
