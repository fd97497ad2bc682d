use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{CategoryId, ItemId};

/// Направление сортировки в задании.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortDirection {
    /// От большего к меньшему: каждая следующая карточка <= предыдущей.
    Descending,
    /// От меньшего к большему: каждая следующая карточка >= предыдущей.
    Ascending,
}

impl SortDirection {
    /// Не нарушает ли `current` порядок относительно `previous`.
    /// Равные значения порядок не ломают.
    pub fn in_order(self, previous: f64, current: f64) -> bool {
        match self {
            SortDirection::Descending => current <= previous,
            SortDirection::Ascending => current >= previous,
        }
    }
}

/// Задание раунда: "отранжируй по атрибуту X в таком-то направлении".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    /// Имя числового атрибута карточки.
    pub attribute: String,
    pub direction: SortDirection,
    /// Текст для отображения ("Rank by population, highest first").
    pub label: String,
}

impl Prompt {
    pub fn new(attribute: impl Into<String>, direction: SortDirection, label: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction,
            label: label.into(),
        }
    }
}

/// Карточка каталога: id + набор числовых атрибутов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub attributes: BTreeMap<String, f64>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// Категория каталога (страны, фильмы, ...).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub items: Vec<Item>,
    pub prompts: Vec<Prompt>,
}
