use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Номинал блокирующего токена. Набор фиксирован: 2, 4, 6 очков.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Denomination {
    Two,
    Four,
    Six,
}

impl Denomination {
    pub const ALL: [Denomination; 3] = [Denomination::Two, Denomination::Four, Denomination::Six];

    /// Сколько очков стоит токен (и сколько получает блокер при провале биддера).
    pub fn points(self) -> u32 {
        match self {
            Denomination::Two => 2,
            Denomination::Four => 4,
            Denomination::Six => 6,
        }
    }

    pub fn from_points(points: u32) -> Option<Self> {
        match points {
            2 => Some(Denomination::Two),
            4 => Some(Denomination::Four),
            6 => Some(Denomination::Six),
            _ => None,
        }
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-pt", self.points())
    }
}

/// Инвентарь токенов одного игрока: номинал -> количество.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenInventory {
    counts: BTreeMap<Denomination, u32>,
}

impl TokenInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Стартовый набор: `per_denomination` токенов каждого номинала.
    pub fn starting(per_denomination: u32) -> Self {
        let mut inv = Self::new();
        for d in Denomination::ALL {
            inv.counts.insert(d, per_denomination);
        }
        inv
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    pub fn has(&self, denomination: Denomination) -> bool {
        self.count(denomination) > 0
    }

    pub fn add(&mut self, denomination: Denomination) {
        *self.counts.entry(denomination).or_insert(0) += 1;
    }

    /// Забрать один токен. `false`, если токена этого номинала нет.
    pub fn take(&mut self, denomination: Denomination) -> bool {
        match self.counts.get_mut(&denomination) {
            Some(c) if *c > 0 => {
                *c -= 1;
                true
            }
            _ => false,
        }
    }

    /// Всего токенов (все номиналы).
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Denomination, u32)> + '_ {
        Denomination::ALL.into_iter().map(move |d| (d, self.count(d)))
    }
}
