use serde::{Deserialize, Serialize};

use crate::domain::ItemId;
use crate::engine::errors::EngineError;

/// Откуда взята выбранная карточка.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionSource {
    /// Из пула раунда (после блокировок).
    Pool,
    /// Из личной коллекции биддера: сгорает навсегда.
    Owned,
}

/// Выбор карточек биддером: ровно `quota` штук.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    pub quota: u32,
    /// Пул минус заблокированные.
    pub available: Vec<ItemId>,
    /// Карточки биддера во владении, если правила разрешают их брать.
    pub owned_available: Vec<ItemId>,
    pub selected: Vec<ItemId>,
}

/// Хватает ли карточек для ставки. Если нет: автоматический провал.
pub fn pool_covers_bid(remaining: usize, quota: u32) -> bool {
    remaining >= quota as usize
}

impl SelectionState {
    pub fn new(quota: u32, available: Vec<ItemId>, owned_available: Vec<ItemId>) -> Self {
        Self {
            quota,
            available,
            owned_available,
            selected: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.selected.len() == self.quota as usize
    }

    pub fn remaining_quota(&self) -> u32 {
        self.quota - self.selected.len() as u32
    }

    /// Проверка выбора без мутации. Возвращает источник карточки.
    pub fn validate_select(&self, item_id: &str) -> Result<SelectionSource, EngineError> {
        if self.is_complete() {
            return Err(EngineError::SelectionQuotaFilled(self.quota));
        }
        if self.selected.iter().any(|i| i == item_id) {
            return Err(EngineError::ItemAlreadySelected(item_id.to_string()));
        }
        if self.available.iter().any(|i| i == item_id) {
            return Ok(SelectionSource::Pool);
        }
        if self.owned_available.iter().any(|i| i == item_id) {
            return Ok(SelectionSource::Owned);
        }
        Err(EngineError::ItemNotSelectable(item_id.to_string()))
    }

    pub fn select(&mut self, item_id: &str) -> Result<SelectionSource, EngineError> {
        let source = self.validate_select(item_id)?;

        if source == SelectionSource::Owned {
            self.owned_available.retain(|i| i != item_id);
        }
        self.selected.push(item_id.to_string());

        Ok(source)
    }
}
