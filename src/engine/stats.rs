use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::stats::PlayerStats;
use crate::domain::PlayerId;

/// Событие для статистики.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatEvent {
    BidPlaced,
    Passed,
    BidWon,
    RankingSucceeded,
    BlockMade,
    BlockingPoints(u32),
    TokenGained,
    TokenLost,
    ItemsRanked(u32),
    ItemOwned,
}

/// Наблюдатель: копит счётчики, на игру не влияет.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatisticsTracker {
    per_player: BTreeMap<PlayerId, PlayerStats>,
}

impl StatisticsTracker {
    pub fn new(players: &[PlayerId]) -> Self {
        Self {
            per_player: players.iter().map(|&p| (p, PlayerStats::default())).collect(),
        }
    }

    pub fn record(&mut self, player_id: PlayerId, event: StatEvent) {
        let s = self.per_player.entry(player_id).or_default();
        match event {
            StatEvent::BidPlaced => s.bid_attempts += 1,
            StatEvent::Passed => s.bids_passed += 1,
            StatEvent::BidWon => s.bids_won += 1,
            StatEvent::RankingSucceeded => s.successful_rankings += 1,
            StatEvent::BlockMade => s.blocks_made += 1,
            StatEvent::BlockingPoints(points) => s.blocking_points_earned += points,
            StatEvent::TokenGained => s.tokens_gained += 1,
            StatEvent::TokenLost => s.tokens_lost += 1,
            StatEvent::ItemsRanked(n) => s.items_ranked += n,
            StatEvent::ItemOwned => s.items_owned_gained += 1,
        }
    }

    pub fn get(&self, player_id: PlayerId) -> PlayerStats {
        self.per_player.get(&player_id).copied().unwrap_or_default()
    }

    pub fn all(&self) -> &BTreeMap<PlayerId, PlayerStats> {
        &self.per_player
    }

    /// Σ bids_won по всем игрокам.
    pub fn total_bids_won(&self) -> u32 {
        self.per_player.values().map(|s| s.bids_won).sum()
    }

    /// Полный сброс (явная команда, между партиями счётчики живут).
    pub fn reset(&mut self) {
        for s in self.per_player.values_mut() {
            *s = PlayerStats::default();
        }
    }
}
