//! Доменная модель игры: игроки, токены, правила, каталог, история раундов.

pub mod catalog;
pub mod player;
pub mod round;
pub mod rules;
pub mod stats;
pub mod token;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type SessionId = u64;
pub type ItemId = String;
pub type CategoryId = String;
/// Номер раунда, начиная с 1.
pub type RoundNumber = u32;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Prompt и т.п.
pub use catalog::*;
pub use player::*;
pub use round::*;
pub use rules::*;
pub use stats::*;
pub use token::*;
