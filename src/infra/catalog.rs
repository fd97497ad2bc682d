use std::collections::BTreeMap;

use crate::domain::catalog::{Category, Item, Prompt, SortDirection};
use crate::domain::{CategoryId, ItemId};

/// Источник карточек и атрибутов. Ядро только читает.
pub trait CatalogAdapter {
    /// Все id карточек категории (`None`: категории нет).
    fn item_ids(&self, category: &str) -> Option<Vec<ItemId>>;

    /// Значение атрибута карточки.
    fn attribute(&self, item_id: &str, attribute: &str) -> Option<f64>;

    /// Возможные задания для категории.
    fn prompts(&self, category: &str) -> Option<Vec<Prompt>>;
}

/// Каталог в памяти: для тестов, CLI и встраивания.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    categories: BTreeMap<CategoryId, Category>,
    items: BTreeMap<ItemId, Item>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить (или заменить) категорию вместе с её карточками.
    pub fn add_category(&mut self, category: Category) {
        for item in &category.items {
            self.items.insert(item.id.clone(), item.clone());
        }
        self.categories.insert(category.id.clone(), category);
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.keys().cloned().collect()
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Небольшой встроенный каталог стран.
    pub fn demo() -> Self {
        let rows: [(&str, &str, f64, f64, f64); 14] = [
            ("chn", "China", 1411.0, 9597.0, 17963.0),
            ("ind", "India", 1408.0, 3287.0, 3385.0),
            ("usa", "United States", 333.0, 9834.0, 25463.0),
            ("idn", "Indonesia", 276.0, 1905.0, 1319.0),
            ("bra", "Brazil", 215.0, 8516.0, 1920.0),
            ("nga", "Nigeria", 218.0, 924.0, 477.0),
            ("jpn", "Japan", 125.0, 378.0, 4231.0),
            ("deu", "Germany", 84.0, 358.0, 4072.0),
            ("fra", "France", 68.0, 552.0, 2783.0),
            ("gbr", "United Kingdom", 67.0, 244.0, 3071.0),
            ("ita", "Italy", 59.0, 302.0, 2010.0),
            ("can", "Canada", 39.0, 9985.0, 2140.0),
            ("aus", "Australia", 26.0, 7692.0, 1675.0),
            ("nzl", "New Zealand", 5.0, 268.0, 247.0),
        ];

        let items = rows
            .iter()
            .map(|&(id, name, population, area, gdp)| {
                Item::new(id, name)
                    .with_attribute("population", population)
                    .with_attribute("area", area)
                    .with_attribute("gdp", gdp)
            })
            .collect();

        let prompts = vec![
            Prompt::new("population", SortDirection::Descending, "Население, от большего"),
            Prompt::new("area", SortDirection::Descending, "Площадь, от большей"),
            Prompt::new("gdp", SortDirection::Ascending, "ВВП, от меньшего"),
        ];

        let mut catalog = Self::new();
        catalog.add_category(Category {
            id: "countries".to_string(),
            name: "Countries".to_string(),
            items,
            prompts,
        });
        catalog
    }
}

impl CatalogAdapter for InMemoryCatalog {
    fn item_ids(&self, category: &str) -> Option<Vec<ItemId>> {
        self.categories
            .get(category)
            .map(|c| c.items.iter().map(|i| i.id.clone()).collect())
    }

    fn attribute(&self, item_id: &str, attribute: &str) -> Option<f64> {
        self.items
            .get(item_id)
            .and_then(|i| i.attributes.get(attribute))
            .copied()
    }

    fn prompts(&self, category: &str) -> Option<Vec<Prompt>> {
        self.categories.get(category).map(|c| c.prompts.clone())
    }
}
