use serde::{Deserialize, Serialize};

use crate::domain::token::Denomination;
use crate::domain::{ItemId, PlayerId};

/// Тип действия игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum PlayerActionKind {
    /// Ставка на 1 больше текущей.
    Bid,
    Pass,
    /// Потратить токен на карточку пула.
    Block {
        denomination: Denomination,
        item_id: ItemId,
    },
    /// Пропустить ход блокировки.
    SkipBlock,
    /// Взять карточку в выборку (только биддер).
    SelectItem(ItemId),
}

/// Конкретное действие игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerAction {
    /// Какой игрок действует.
    pub player_id: PlayerId,
    /// Само действие.
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(player_id: PlayerId, kind: PlayerActionKind) -> Self {
        Self { player_id, kind }
    }
}
