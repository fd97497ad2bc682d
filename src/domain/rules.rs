// src/domain/rules.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Верхняя граница для max_bid / pool_size (защита от мусорных конфигов).
pub const MAX_POOL_SIZE: u32 = 50;

/// Ошибка конфигурации правил. Отклоняется на старте сессии.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Некорректная конфигурация правил: {0}")]
    InvalidValue(String),

    #[error("Неизвестный пресет правил: {0}")]
    UnknownPreset(String),

    #[error("Не удалось разобрать JSON правил: {0}")]
    Parse(String),
}

/// Набор правил партии.
///
/// Фиксируется на всю партию (минимум на раунд): менять посреди раунда нельзя,
/// `GameSession::apply_rules` пускает замену только на границе партии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleConfig {
    /// Сколько токенов каждого номинала (2/4/6) получает игрок на старте.
    pub starting_tokens_per_denomination: u32,

    /// Заблокированная карточка переходит во владение блокера.
    pub token_ownership: bool,

    /// Владение только за успешный блок (биддер провалился).
    pub require_successful_block: bool,

    /// Есть ли вообще фаза блокировки.
    pub allow_blocking: bool,

    /// Может ли биддер добирать в выборку свои ранее полученные карточки.
    pub allow_owned_in_selection: bool,

    /// Возвращать ли отранжированные карточки обратно в колоду категории.
    pub refresh_used_items: bool,

    /// Потолок ставки.
    pub max_bid: u32,

    /// Множитель очков за успешную ставку, в процентах (100 = ровно ставка).
    pub bid_multiplier_percent: u32,

    /// Сколько карточек тянем в пул раунда.
    pub pool_size: u32,

    /// Максимум раундов в партии.
    pub max_rounds: u32,

    /// Очки для победы.
    pub winning_score: u32,

    /// Бонус в конце партии за каждую карточку во владении.
    pub end_game_owned_item_points: u32,

    /// Бонус в конце партии за каждый оставшийся блокирующий токен.
    pub end_game_token_points: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl RuleConfig {
    /// Классика: без владения, без бонусов.
    pub fn classic() -> Self {
        Self {
            starting_tokens_per_denomination: 1,
            token_ownership: false,
            require_successful_block: true,
            allow_blocking: true,
            allow_owned_in_selection: false,
            refresh_used_items: false,
            max_bid: 10,
            bid_multiplier_percent: 100,
            pool_size: 10,
            max_rounds: 6,
            winning_score: 30,
            end_game_owned_item_points: 0,
            end_game_token_points: 0,
        }
    }

    /// Владение карточками + бонусы в конце.
    pub fn token_ownership() -> Self {
        Self {
            token_ownership: true,
            allow_owned_in_selection: true,
            end_game_owned_item_points: 1,
            end_game_token_points: 1,
            ..Self::classic()
        }
    }

    /// Больше токенов, двойные очки за ставку, длиннее партия.
    pub fn high_stakes() -> Self {
        Self {
            starting_tokens_per_denomination: 2,
            token_ownership: true,
            allow_owned_in_selection: true,
            refresh_used_items: true,
            max_bid: 15,
            bid_multiplier_percent: 200,
            max_rounds: 8,
            winning_score: 50,
            end_game_owned_item_points: 2,
            end_game_token_points: 1,
            ..Self::classic()
        }
    }

    /// Короткая партия без блокировок.
    pub fn experimental() -> Self {
        Self {
            starting_tokens_per_denomination: 3,
            token_ownership: false,
            require_successful_block: false,
            allow_blocking: false,
            refresh_used_items: true,
            max_bid: 5,
            bid_multiplier_percent: 50,
            max_rounds: 3,
            winning_score: 15,
            ..Self::classic()
        }
    }

    /// Пресет по имени: "classic" | "token-ownership" | "high-stakes" | "experimental".
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "classic" => Ok(Self::classic()),
            "token-ownership" => Ok(Self::token_ownership()),
            "high-stakes" => Ok(Self::high_stakes()),
            "experimental" => Ok(Self::experimental()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Разобрать правила из JSON. Пропущенные ключи берутся из `classic()`.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: RuleConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Очки за успешную ставку с учётом множителя (округление вниз).
    pub fn bid_points(&self, bid: u32) -> u32 {
        bid.saturating_mul(self.bid_multiplier_percent) / 100
    }

    /// Проверка диапазонов. Никакой "умной" валидации сочетаний флагов.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bid == 0 || self.max_bid > MAX_POOL_SIZE {
            return Err(ConfigError::InvalidValue(format!(
                "RuleConfig: max_bid must be in [1, {}], got {}",
                MAX_POOL_SIZE, self.max_bid
            )));
        }

        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(ConfigError::InvalidValue(format!(
                "RuleConfig: pool_size must be in [1, {}], got {}",
                MAX_POOL_SIZE, self.pool_size
            )));
        }

        if self.max_rounds == 0 {
            return Err(ConfigError::InvalidValue(
                "RuleConfig: max_rounds = 0".into(),
            ));
        }

        if self.winning_score == 0 {
            return Err(ConfigError::InvalidValue(
                "RuleConfig: winning_score = 0".into(),
            ));
        }

        if self.bid_multiplier_percent == 0 || self.bid_multiplier_percent > 1000 {
            return Err(ConfigError::InvalidValue(format!(
                "RuleConfig: bid_multiplier_percent must be in [1, 1000], got {}",
                self.bid_multiplier_percent
            )));
        }

        if self.starting_tokens_per_denomination > 100 {
            return Err(ConfigError::InvalidValue(
                "RuleConfig: starting_tokens_per_denomination > 100".into(),
            ));
        }

        if self.allow_owned_in_selection && !self.token_ownership {
            return Err(ConfigError::InvalidValue(
                "RuleConfig: allow_owned_in_selection requires token_ownership".into(),
            ));
        }

        Ok(())
    }
}
