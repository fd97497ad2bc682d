use serde::{Deserialize, Serialize};

use crate::domain::round::RoundOutcome;
use crate::domain::token::Denomination;
use crate::domain::{CategoryId, ItemId, PlayerId, RoundNumber};
use crate::engine::phase::Phase;

/// Тип события в партии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum RoundEventKind {
    /// Новый раунд: выбрана категория и задание.
    RoundStarted {
        round: RoundNumber,
        category: CategoryId,
        attribute: String,
    },

    /// Вытянут пул карточек.
    PoolDrawn { items: Vec<ItemId> },

    /// Ставка принята.
    BidPlaced { player_id: PlayerId, amount: u32 },

    /// Игрок спасовал.
    Passed { player_id: PlayerId },

    /// Все спасовали без ставок: торги заново.
    BiddingRestarted,

    /// Торги закрыты.
    BiddingResolved { bidder: PlayerId, amount: u32 },

    /// Блок карточки токеном.
    ItemBlocked {
        player_id: PlayerId,
        item_id: ItemId,
        denomination: Denomination,
    },

    /// Блокер пропустил ход.
    BlockSkipped { player_id: PlayerId },

    /// Биддер взял карточку в выборку.
    ItemSelected { item_id: ItemId, from_owned: bool },

    /// Биддер отправил ранжирование.
    RankingSubmitted { ranking: Vec<ItemId> },

    /// Открыта очередная карточка.
    ItemRevealed { index: usize, in_sequence: bool },

    /// Переход фазы.
    PhaseChanged { from: Phase, to: Phase },

    /// Очки начислены.
    RoundScored {
        round: RoundNumber,
        outcome: RoundOutcome,
    },

    /// Токен ушёл от блокера к биддеру.
    TokenTransferred {
        from: PlayerId,
        to: PlayerId,
        denomination: Denomination,
    },

    /// Карточка перешла во владение.
    OwnershipGranted { player_id: PlayerId, item_id: ItemId },

    /// Бонусы конца партии.
    EndGameBonus { player_id: PlayerId, points: u32 },

    /// Партия окончена.
    GameFinished { winners: Vec<PlayerId> },
}

/// Событие с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundEvent {
    pub index: u32,
    pub kind: RoundEventKind,
}

/// Журнал событий партии.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RoundHistory {
    pub events: Vec<RoundEvent>,
}

impl RoundHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: RoundEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(RoundEvent { index: idx, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
