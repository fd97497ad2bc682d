//! Инфраструктурный слой вокруг движка:
//! - каталог карточек (адаптер + каталог в памяти);
//! - генерация ID;
//! - RNG-реализации для движка.

pub mod catalog;
pub mod ids;
pub mod rng;

pub use catalog::*;
pub use ids::*;
pub use rng::*;
