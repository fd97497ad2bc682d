use serde::{Deserialize, Serialize};

use crate::domain::catalog::Prompt;
use crate::domain::token::Denomination;
use crate::domain::{CategoryId, ItemId, PlayerId, RoundNumber};

/// Почему биддер провалился.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FailureReason {
    /// После блокировок в пуле осталось меньше карточек, чем ставка.
    InsufficientPool,
    /// Порядок сломался при вскрытии.
    SequenceBreak,
}

/// Итог раунда для биддера.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundOutcome {
    pub success: bool,
    pub reason: Option<FailureReason>,
    /// Позиция в ранжировании, где сломалась последовательность.
    pub break_index: Option<usize>,
}

impl RoundOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            reason: None,
            break_index: None,
        }
    }

    pub fn insufficient_pool() -> Self {
        Self {
            success: false,
            reason: Some(FailureReason::InsufficientPool),
            break_index: None,
        }
    }

    pub fn sequence_break(index: usize) -> Self {
        Self {
            success: false,
            reason: Some(FailureReason::SequenceBreak),
            break_index: Some(index),
        }
    }
}

/// Один блок: кто, какую карточку, каким токеном.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockRecord {
    pub player_id: PlayerId,
    pub item_id: ItemId,
    pub denomination: Denomination,
}

/// Завершённый раунд. После скоринга: неизменяемая история.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundRecord {
    pub number: RoundNumber,
    pub category: CategoryId,
    pub prompt: Prompt,
    pub bidder: PlayerId,
    pub bid: u32,
    pub pool: Vec<ItemId>,
    pub blocks: Vec<BlockRecord>,
    pub selected: Vec<ItemId>,
    /// Ранжирование биддера (пустое при автоматическом провале).
    pub ranking: Vec<ItemId>,
    pub outcome: RoundOutcome,
}
