use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, ErrorKind};

/// Класс ошибки, который видит клиент.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest,
    /// Команда нарушает правила игры; состояние не изменилось.
    RuleViolation,
    /// Некорректные правила или состав игроков.
    Configuration,
    /// Нарушена целостность (сохранение токенов).
    Integrity,
    /// Внутренняя ошибка движка.
    Internal,
}

impl From<ErrorKind> for ApiErrorKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::RuleViolation => ApiErrorKind::RuleViolation,
            ErrorKind::Configuration => ApiErrorKind::Configuration,
            ErrorKind::Integrity => ApiErrorKind::Integrity,
            ErrorKind::Internal => ApiErrorKind::Internal,
        }
    }
}

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// Стабильный код причины (`bid_out_of_sequence`, `wrong_phase`, ...).
    pub code: String,
    /// Человекочитаемое сообщение.
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::BadRequest,
            code: "bad_request".to_string(),
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self {
            kind: err.kind().into(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
