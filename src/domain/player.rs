use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

/// Базовый профиль игрока: то, что не зависит от конкретной партии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
}

impl PlayerProfile {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Игрок в партии.
///
/// Токены и карточки во владении живут в `TokenLedger`,
/// статистика в `StatisticsTracker`, здесь только счёт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Имя, уникальное в пределах сессии.
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            score: 0,
        }
    }
}
