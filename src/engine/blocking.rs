use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::player::Player;
use crate::domain::round::BlockRecord;
use crate::domain::token::{Denomination, TokenInventory};
use crate::domain::{ItemId, PlayerId};
use crate::engine::errors::EngineError;

/// Фаза блокировки: не-биддеры по очереди тратят токен на карточку или пропускают ход.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockingState {
    /// Очередь блокеров (считается один раз на раунд).
    pub order: Vec<PlayerId>,
    /// Индекс текущего блокера в `order`. `order.len()` = фаза закончена.
    pub turn_index: usize,
    /// Блоки в порядке ходов; токены "в эскроу" до скоринга.
    pub blocks: Vec<BlockRecord>,
    /// Номинал, уже использованный игроком в этом раунде.
    pub used: BTreeMap<PlayerId, Denomination>,
}

impl BlockingState {
    pub fn new(order: Vec<PlayerId>) -> Self {
        Self {
            order,
            turn_index: 0,
            blocks: Vec::new(),
            used: BTreeMap::new(),
        }
    }

    /// Пустая фаза (блокировки выключены правилами).
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    pub fn current_blocker(&self) -> Option<PlayerId> {
        self.order.get(self.turn_index).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.turn_index >= self.order.len()
    }

    pub fn is_blocked(&self, item_id: &str) -> bool {
        self.blocks.iter().any(|b| b.item_id == item_id)
    }

    pub fn blocked_items(&self) -> Vec<ItemId> {
        self.blocks.iter().map(|b| b.item_id.clone()).collect()
    }

    fn ensure_turn(&self, player_id: PlayerId) -> Result<(), EngineError> {
        if self.current_blocker() != Some(player_id) {
            return Err(EngineError::NotPlayersTurn(player_id));
        }
        Ok(())
    }

    /// Проверка блока без мутации.
    pub fn validate_block(
        &self,
        player_id: PlayerId,
        denomination: Denomination,
        item_id: &str,
        pool: &[ItemId],
        inventory: &TokenInventory,
    ) -> Result<(), EngineError> {
        self.ensure_turn(player_id)?;

        if self.used.contains_key(&player_id) {
            return Err(EngineError::TokenAlreadyUsed(player_id));
        }
        if !inventory.has(denomination) {
            return Err(EngineError::NoUnusedToken {
                player_id,
                denomination,
            });
        }
        if !pool.iter().any(|i| i == item_id) {
            return Err(EngineError::ItemNotInPool(item_id.to_string()));
        }
        if self.is_blocked(item_id) {
            return Err(EngineError::ItemAlreadyBlocked(item_id.to_string()));
        }
        Ok(())
    }

    /// Заблокировать карточку. Ход переходит дальше.
    pub fn block(
        &mut self,
        player_id: PlayerId,
        denomination: Denomination,
        item_id: &str,
        pool: &[ItemId],
        inventory: &TokenInventory,
    ) -> Result<BlockRecord, EngineError> {
        self.validate_block(player_id, denomination, item_id, pool, inventory)?;

        let record = BlockRecord {
            player_id,
            item_id: item_id.to_string(),
            denomination,
        };
        self.used.insert(player_id, denomination);
        self.blocks.push(record.clone());
        self.turn_index += 1;

        Ok(record)
    }

    /// Пропустить ход.
    pub fn skip(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        self.ensure_turn(player_id)?;
        self.turn_index += 1;
        Ok(())
    }
}

/// Очередь блокировки: все, кроме биддера, по возрастанию счёта.
/// Отстающий блокирует первым; при равенстве: порядок рассадки.
pub fn blocking_order(players: &[Player], bidder: PlayerId) -> Vec<PlayerId> {
    let mut others: Vec<&Player> = players.iter().filter(|p| p.id != bidder).collect();
    // sort_by_key стабилен
    others.sort_by_key(|p| p.score);
    others.into_iter().map(|p| p.id).collect()
}
