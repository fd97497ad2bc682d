use std::fmt;

use serde::{Deserialize, Serialize};

/// Фаза раунда. Ровно одна фаза активна в каждый момент.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Ждём выбора категории.
    CategoryChoice,
    /// Категория и задание выбраны, ждём вытягивания пула.
    Drawing,
    Bidding,
    Blocking,
    Selection,
    /// Карточки выбраны, ждём порядок от биддера.
    Ranking,
    Reveal,
    /// Вердикт известен, ждём начисления очков.
    Scoring,
    /// Очки начислены, ждём `advance_round`.
    RoundComplete,
    GameOver,
}

impl Phase {
    /// Таблица допустимых переходов.
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;

        matches!(
            (self, next),
            (CategoryChoice, Drawing)
                | (Drawing, Bidding)
                | (Bidding, Blocking)
                | (Blocking, Selection)
                // автоматический провал: пул меньше ставки
                | (Blocking, Scoring)
                | (Selection, Ranking)
                | (Ranking, Reveal)
                | (Reveal, Scoring)
                | (Scoring, RoundComplete)
                | (RoundComplete, CategoryChoice)
                | (RoundComplete, GameOver)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
