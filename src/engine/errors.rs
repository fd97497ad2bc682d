use thiserror::Error;

use crate::domain::rules::ConfigError;
use crate::domain::token::Denomination;
use crate::domain::PlayerId;
use crate::engine::phase::Phase;

/// Крупная категория ошибки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Команда нарушает правила (не та фаза, не тот ход, неверная ставка).
    /// Состояние не меняется.
    RuleViolation,
    /// Некорректные правила/состав игроков на старте.
    Configuration,
    /// Нарушен инвариант сохранения токенов: баг логики.
    Integrity,
    Internal,
}

/// Ошибки игрового движка.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Команда недоступна в фазе {actual:?} (нужна {expected})")]
    WrongPhase { expected: &'static str, actual: Phase },

    #[error("Игрок {0} не найден в сессии")]
    UnknownPlayer(PlayerId),

    #[error("Сейчас не ход игрока с id={0}")]
    NotPlayersTurn(PlayerId),

    #[error("Ставка должна быть ровно {expected}, получено {got}")]
    BidOutOfSequence { expected: u32, got: u32 },

    #[error("Ставка {bid} выше потолка {max}")]
    BidAboveMax { bid: u32, max: u32 },

    #[error("Торги не открыты")]
    BiddingClosed,

    #[error("Игрок {0} уже спасовал")]
    PlayerAlreadyPassed(PlayerId),

    #[error("Лидер торгов {0} не может спасовать")]
    HighBidderCannotPass(PlayerId),

    #[error("У игрока {player_id} нет свободного токена {denomination}")]
    NoUnusedToken { player_id: PlayerId, denomination: Denomination },

    #[error("Игрок {0} уже использовал токен в этом раунде")]
    TokenAlreadyUsed(PlayerId),

    #[error("Карточки {0} нет в пуле раунда")]
    ItemNotInPool(String),

    #[error("Карточка {0} уже заблокирована")]
    ItemAlreadyBlocked(String),

    #[error("Карточку {0} нельзя выбрать")]
    ItemNotSelectable(String),

    #[error("Карточка {0} уже выбрана")]
    ItemAlreadySelected(String),

    #[error("Квота выбора ({0}) уже заполнена")]
    SelectionQuotaFilled(u32),

    #[error("Ранжирование должно быть перестановкой выбранных карточек")]
    RankingMismatch,

    #[error("Категория {0} не найдена в каталоге")]
    UnknownCategory(String),

    #[error("Задание не принадлежит категории {0}")]
    UnknownPrompt(String),

    #[error("У карточки {item} нет атрибута {attribute}")]
    MissingAttribute { item: String, attribute: String },

    #[error("Раунд {0} уже посчитан")]
    RoundAlreadyScored(u32),

    #[error("Партия окончена")]
    GameOver,

    #[error("Недостаточно игроков для партии (нужно минимум 2)")]
    NotEnoughPlayers,

    #[error("Игрок с id={0} или таким же именем уже есть")]
    DuplicatePlayer(PlayerId),

    #[error("Правила можно менять только на границе партии")]
    RulesLocked,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Нарушено сохранение токенов {denomination}: ожидалось {expected}, найдено {found}")]
    IntegrityViolation {
        denomination: Denomination,
        expected: u32,
        found: u32,
    },

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Config(_)
            | EngineError::NotEnoughPlayers
            | EngineError::DuplicatePlayer(_) => ErrorKind::Configuration,
            EngineError::IntegrityViolation { .. } => ErrorKind::Integrity,
            EngineError::Internal(_) => ErrorKind::Internal,
            _ => ErrorKind::RuleViolation,
        }
    }

    /// Стабильный код причины для клиента.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::WrongPhase { .. } => "wrong_phase",
            EngineError::UnknownPlayer(_) => "unknown_player",
            EngineError::NotPlayersTurn(_) => "not_players_turn",
            EngineError::BidOutOfSequence { .. } => "bid_out_of_sequence",
            EngineError::BidAboveMax { .. } => "bid_above_max",
            EngineError::BiddingClosed => "bidding_closed",
            EngineError::PlayerAlreadyPassed(_) => "player_already_passed",
            EngineError::HighBidderCannotPass(_) => "high_bidder_cannot_pass",
            EngineError::NoUnusedToken { .. } => "no_unused_token",
            EngineError::TokenAlreadyUsed(_) => "token_already_used",
            EngineError::ItemNotInPool(_) => "item_not_in_pool",
            EngineError::ItemAlreadyBlocked(_) => "item_already_blocked",
            EngineError::ItemNotSelectable(_) => "item_not_selectable",
            EngineError::ItemAlreadySelected(_) => "item_already_selected",
            EngineError::SelectionQuotaFilled(_) => "selection_quota_filled",
            EngineError::RankingMismatch => "ranking_mismatch",
            EngineError::UnknownCategory(_) => "unknown_category",
            EngineError::UnknownPrompt(_) => "unknown_prompt",
            EngineError::MissingAttribute { .. } => "missing_attribute",
            EngineError::RoundAlreadyScored(_) => "round_already_scored",
            EngineError::GameOver => "game_over",
            EngineError::NotEnoughPlayers => "not_enough_players",
            EngineError::DuplicatePlayer(_) => "duplicate_player",
            EngineError::RulesLocked => "rules_locked",
            EngineError::Config(_) => "invalid_config",
            EngineError::IntegrityViolation { .. } => "integrity_violation",
            EngineError::Internal(_) => "internal",
        }
    }
}
