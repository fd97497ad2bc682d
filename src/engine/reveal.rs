//! Пошаговое вскрытие ранжирования биддера.
//!
//! Каждый `reveal()` открывает ещё одну карточку и, начиная со второй,
//! сравнивает её с предыдущей по направлению задания. Первое нарушение
//! фиксирует провал; оставшиеся карточки открываются без сравнения.
//! Никаких задержек внутри, темп вскрытия задаёт рендер.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::SortDirection;
use crate::domain::ItemId;

/// Статус валидации.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RevealStatus {
    Validating,
    Succeeded,
    Failed,
}

impl RevealStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RevealStatus::Validating)
    }
}

/// Пометка карточки в ранжировании.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RevealMark {
    Hidden,
    /// Открыта и стоит на своём месте относительно предыдущей.
    InSequence,
    /// Здесь последовательность сломалась.
    SequenceBreak,
    /// Открыта после провала, без сравнения.
    Unverified,
}

/// Карточка ранжирования вместе с истинным значением атрибута.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RankedItem {
    pub item_id: ItemId,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RevealValidator {
    pub direction: SortDirection,
    pub ranking: Vec<RankedItem>,
    /// Правильный порядок (стабильная сортировка: равные значения
    /// сохраняют порядок из ранжирования биддера).
    pub correct_order: Vec<ItemId>,
    pub revealed: usize,
    pub status: RevealStatus,
    pub break_index: Option<usize>,
    pub marks: Vec<RevealMark>,
}

impl RevealValidator {
    pub fn new(ranking: Vec<RankedItem>, direction: SortDirection) -> Self {
        let correct_order = correct_ordering(&ranking, direction);
        let marks = vec![RevealMark::Hidden; ranking.len()];
        let status = if ranking.is_empty() {
            RevealStatus::Succeeded
        } else {
            RevealStatus::Validating
        };

        Self {
            direction,
            ranking,
            correct_order,
            revealed: 0,
            status,
            break_index: None,
            marks,
        }
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// `Some(true/false)` после завершения, `None` пока идёт вскрытие.
    pub fn success(&self) -> Option<bool> {
        match self.status {
            RevealStatus::Validating => None,
            RevealStatus::Succeeded => Some(true),
            RevealStatus::Failed => Some(false),
        }
    }

    /// Открыть следующую карточку. В терминальном состоянии: no-op.
    pub fn reveal(&mut self) -> RevealStatus {
        if self.is_terminal() {
            return self.status;
        }

        let idx = self.revealed;
        self.revealed += 1;

        if idx == 0 {
            self.marks[0] = RevealMark::InSequence;
        } else {
            let previous = self.ranking[idx - 1].value;
            let current = self.ranking[idx].value;

            if self.direction.in_order(previous, current) {
                self.marks[idx] = RevealMark::InSequence;
            } else {
                self.marks[idx] = RevealMark::SequenceBreak;
                self.status = RevealStatus::Failed;
                self.break_index = Some(idx);

                // Остаток открываем без сравнения.
                for mark in self.marks.iter_mut().skip(idx + 1) {
                    *mark = RevealMark::Unverified;
                }
                self.revealed = self.ranking.len();
                return self.status;
            }
        }

        if self.revealed == self.ranking.len() {
            self.status = RevealStatus::Succeeded;
        }

        self.status
    }

    /// Вскрыть всё до терминального состояния.
    pub fn reveal_all(&mut self) -> RevealStatus {
        while !self.is_terminal() {
            self.reveal();
        }
        self.status
    }
}

/// Правильный порядок карточек по направлению задания.
pub fn correct_ordering(ranking: &[RankedItem], direction: SortDirection) -> Vec<ItemId> {
    let mut sorted: Vec<&RankedItem> = ranking.iter().collect();
    sorted.sort_by(|a, b| match direction {
        SortDirection::Descending => b.value.total_cmp(&a.value),
        SortDirection::Ascending => a.value.total_cmp(&b.value),
    });
    sorted.into_iter().map(|r| r.item_id.clone()).collect()
}

/// Индекс первого нарушения порядка, `None`: порядок верный.
pub fn find_sequence_break(values: &[f64], direction: SortDirection) -> Option<usize> {
    values
        .windows(2)
        .position(|w| !direction.in_order(w[0], w[1]))
        .map(|i| i + 1)
}
