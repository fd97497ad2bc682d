use serde::{Deserialize, Serialize};

/// Счётчики игрока для отчётов. На исход игры не влияют.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub bid_attempts: u32,
    pub bids_passed: u32,
    pub bids_won: u32,
    pub successful_rankings: u32,
    pub blocks_made: u32,
    pub blocking_points_earned: u32,
    pub tokens_gained: u32,
    pub tokens_lost: u32,
    /// Сколько карточек игрок отранжировал как биддер.
    pub items_ranked: u32,
    /// Сколько карточек получил во владение за блоки.
    pub items_owned_gained: u32,
}
