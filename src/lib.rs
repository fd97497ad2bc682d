//! Движок раундовой игры на торги и ранжирование.
//!
//! Игроки торгуются за право отранжировать N карточек по атрибуту,
//! остальные блокируют карточки токенами, биддер выбирает и ранжирует,
//! порядок проверяется пошаговым вскрытием.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;

pub use engine::{EngineError, GameSession, Phase, RandomSource};
