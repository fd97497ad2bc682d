use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::token::{Denomination, TokenInventory};
use crate::domain::{CategoryId, ItemId, PlayerId};
use crate::engine::errors::EngineError;

/// Учёт токенов и карточек во владении.
///
/// Токены только переходят из рук в руки: ни одна операция не создаёт
/// и не уничтожает токен. Это проверяет `verify_conservation`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenLedger {
    starting_per_denomination: u32,
    inventories: BTreeMap<PlayerId, TokenInventory>,
    owned: BTreeMap<PlayerId, BTreeMap<CategoryId, BTreeSet<ItemId>>>,
}

impl TokenLedger {
    pub fn new(players: &[PlayerId], starting_per_denomination: u32) -> Self {
        let inventories = players
            .iter()
            .map(|&p| (p, TokenInventory::starting(starting_per_denomination)))
            .collect();
        let owned = players.iter().map(|&p| (p, BTreeMap::new())).collect();

        Self {
            starting_per_denomination,
            inventories,
            owned,
        }
    }

    pub fn inventory(&self, player_id: PlayerId) -> Option<&TokenInventory> {
        self.inventories.get(&player_id)
    }

    pub fn count(&self, player_id: PlayerId, denomination: Denomination) -> u32 {
        self.inventory(player_id)
            .map(|inv| inv.count(denomination))
            .unwrap_or(0)
    }

    /// Передать один токен `from` -> `to`.
    pub fn transfer(
        &mut self,
        from: PlayerId,
        to: PlayerId,
        denomination: Denomination,
    ) -> Result<(), EngineError> {
        if !self.inventories.contains_key(&to) {
            return Err(EngineError::UnknownPlayer(to));
        }

        let source = self
            .inventories
            .get_mut(&from)
            .ok_or(EngineError::UnknownPlayer(from))?;

        if !source.take(denomination) {
            return Err(EngineError::NoUnusedToken {
                player_id: from,
                denomination,
            });
        }

        self.inventories
            .get_mut(&to)
            .ok_or(EngineError::UnknownPlayer(to))?
            .add(denomination);

        Ok(())
    }

    /// Сумма токенов номинала по всем игрокам.
    pub fn total(&self, denomination: Denomination) -> u32 {
        self.inventories.values().map(|inv| inv.count(denomination)).sum()
    }

    /// Жёсткая проверка сохранения: по каждому номиналу сумма равна
    /// `игроков × стартовое количество`.
    pub fn verify_conservation(&self) -> Result<(), EngineError> {
        let expected = self.inventories.len() as u32 * self.starting_per_denomination;

        for denomination in Denomination::ALL {
            let found = self.total(denomination);
            if found != expected {
                error!(
                    %denomination,
                    expected,
                    found,
                    "нарушено сохранение токенов"
                );
                return Err(EngineError::IntegrityViolation {
                    denomination,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Отдать карточку во владение. `false`, если уже принадлежит этому игроку.
    pub fn grant_ownership(&mut self, player_id: PlayerId, category: &str, item_id: &str) -> bool {
        self.owned
            .entry(player_id)
            .or_default()
            .entry(category.to_string())
            .or_default()
            .insert(item_id.to_string())
    }

    /// Сжечь карточку из коллекции (использована в выборе). Навсегда.
    pub fn consume_owned(&mut self, player_id: PlayerId, category: &str, item_id: &str) -> bool {
        self.owned
            .get_mut(&player_id)
            .and_then(|cats| cats.get_mut(category))
            .map(|items| items.remove(item_id))
            .unwrap_or(false)
    }

    pub fn owns(&self, player_id: PlayerId, category: &str, item_id: &str) -> bool {
        self.owned
            .get(&player_id)
            .and_then(|cats| cats.get(category))
            .map(|items| items.contains(item_id))
            .unwrap_or(false)
    }

    /// Карточки игрока в категории (в порядке id).
    pub fn owned_in_category(&self, player_id: PlayerId, category: &str) -> Vec<ItemId> {
        self.owned
            .get(&player_id)
            .and_then(|cats| cats.get(category))
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Все карточки категории, которые кому-то принадлежат (исключаются из вытягивания).
    pub fn owned_by_anyone(&self, category: &str) -> BTreeSet<ItemId> {
        self.owned
            .values()
            .filter_map(|cats| cats.get(category))
            .flat_map(|items| items.iter().cloned())
            .collect()
    }

    /// Сколько всего карточек у игрока во владении.
    pub fn owned_count(&self, player_id: PlayerId) -> u32 {
        self.owned
            .get(&player_id)
            .map(|cats| cats.values().map(|s| s.len() as u32).sum())
            .unwrap_or(0)
    }

    pub fn owned_items(&self, player_id: PlayerId) -> BTreeMap<CategoryId, BTreeSet<ItemId>> {
        self.owned.get(&player_id).cloned().unwrap_or_default()
    }
}
