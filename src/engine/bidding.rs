use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;
use crate::engine::errors::EngineError;

/// Состояние торгов.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BiddingStatus {
    Idle,
    Open,
    Resolved { bidder: PlayerId, amount: u32 },
}

/// Что произошло после паса.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PassOutcome {
    /// Торги продолжаются.
    Continue,
    /// Остался один игрок со ставкой > 0: он выиграл торги.
    Resolved { bidder: PlayerId, amount: u32 },
    /// Все спасовали без единой ставки: пасы сброшены, торги заново.
    Restarted,
}

/// Что произошло после ставки.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BidOutcome {
    /// Торги продолжаются.
    Continue,
    /// Остальные уже спасовали: ставка сразу выигрывает торги.
    Resolved { bidder: PlayerId, amount: u32 },
}

/// Восходящие торги: каждая ставка ровно на 1 больше текущей.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BiddingState {
    pub status: BiddingStatus,
    pub current_bid: u32,
    pub high_bidder: Option<PlayerId>,
    pub max_bid: u32,
    /// Участники торгов в порядке рассадки.
    pub participants: Vec<PlayerId>,
    pub passed: BTreeSet<PlayerId>,
}

impl BiddingState {
    pub fn new(max_bid: u32) -> Self {
        Self {
            status: BiddingStatus::Idle,
            current_bid: 0,
            high_bidder: None,
            max_bid,
            participants: Vec::new(),
            passed: BTreeSet::new(),
        }
    }

    /// Открыть торги для заданных игроков.
    pub fn open(&mut self, participants: Vec<PlayerId>) {
        self.status = BiddingStatus::Open;
        self.current_bid = 0;
        self.high_bidder = None;
        self.participants = participants;
        self.passed.clear();
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, BiddingStatus::Resolved { .. })
    }

    /// Победитель торгов, если торги закрыты.
    pub fn winner(&self) -> Option<(PlayerId, u32)> {
        match self.status {
            BiddingStatus::Resolved { bidder, amount } => Some((bidder, amount)),
            _ => None,
        }
    }

    /// Следующая допустимая ставка.
    pub fn next_bid(&self) -> u32 {
        self.current_bid + 1
    }

    /// Кто ещё не спасовал.
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.participants
            .iter()
            .copied()
            .filter(|p| !self.passed.contains(p))
            .collect()
    }

    fn ensure_open(&self, player_id: PlayerId) -> Result<(), EngineError> {
        if self.status != BiddingStatus::Open {
            return Err(EngineError::BiddingClosed);
        }
        if !self.participants.contains(&player_id) {
            return Err(EngineError::UnknownPlayer(player_id));
        }
        Ok(())
    }

    /// Проверка ставки без мутации.
    pub fn validate_bid(&self, player_id: PlayerId, amount: u32) -> Result<(), EngineError> {
        self.ensure_open(player_id)?;

        if self.passed.contains(&player_id) {
            return Err(EngineError::PlayerAlreadyPassed(player_id));
        }
        if amount != self.next_bid() {
            return Err(EngineError::BidOutOfSequence {
                expected: self.next_bid(),
                got: amount,
            });
        }
        if amount > self.max_bid {
            return Err(EngineError::BidAboveMax {
                bid: amount,
                max: self.max_bid,
            });
        }
        Ok(())
    }

    /// Принять ставку `amount`. Если кроме ставящего активных не осталось,
    /// торги закрываются сразу.
    pub fn bid(&mut self, player_id: PlayerId, amount: u32) -> Result<BidOutcome, EngineError> {
        self.validate_bid(player_id, amount)?;

        self.current_bid = amount;
        self.high_bidder = Some(player_id);

        if self.active_players() == [player_id] {
            self.status = BiddingStatus::Resolved {
                bidder: player_id,
                amount,
            };
            return Ok(BidOutcome::Resolved {
                bidder: player_id,
                amount,
            });
        }
        Ok(BidOutcome::Continue)
    }

    /// Проверка паса без мутации.
    pub fn validate_pass(&self, player_id: PlayerId) -> Result<(), EngineError> {
        self.ensure_open(player_id)?;

        if self.passed.contains(&player_id) {
            return Err(EngineError::PlayerAlreadyPassed(player_id));
        }
        if self.current_bid > 0 && self.high_bidder == Some(player_id) {
            return Err(EngineError::HighBidderCannotPass(player_id));
        }
        Ok(())
    }

    /// Пас игрока. После паса проверяем, не закончились ли торги.
    pub fn pass(&mut self, player_id: PlayerId) -> Result<PassOutcome, EngineError> {
        self.validate_pass(player_id)?;

        let active: Vec<PlayerId> = self
            .active_players()
            .into_iter()
            .filter(|p| *p != player_id)
            .collect();

        if active.is_empty() && self.current_bid == 0 {
            // Никто не поставил: сбрасываем пасы и торгуемся заново.
            self.passed.clear();
            return Ok(PassOutcome::Restarted);
        }

        if active.len() == 1 && self.current_bid > 0 {
            let bidder = active[0];
            // Лидер не может пасовать, значит оставшийся и есть лидер.
            if self.high_bidder != Some(bidder) {
                return Err(EngineError::Internal("оставшийся игрок не является лидером торгов"));
            }
            let amount = self.current_bid;
            self.passed.insert(player_id);
            self.status = BiddingStatus::Resolved { bidder, amount };
            return Ok(PassOutcome::Resolved { bidder, amount });
        }

        self.passed.insert(player_id);
        Ok(PassOutcome::Continue)
    }
}
