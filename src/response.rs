//! Shape checks for the homework API payload.
use serde_json::Value;
use thiserror::Error;

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ответ API должен быть словарём.")]
    NotAnObject,
    #[error("Отсутствует ключ \"{0}\".")]
    MissingField(&'static str),
    #[error("Ключ \"{0}\" должен быть списком.")]
    WrongType(&'static str),
}

/// Extract the `homeworks` list from a decoded payload. The list is returned
/// as-is and may be empty.
pub fn validate(payload: &Value) -> Result<&[Value], ValidationError> {
    let obj = payload.as_object().ok_or(ValidationError::NotAnObject)?;
    let homeworks = obj
        .get(HOMEWORKS_KEY)
        .ok_or(ValidationError::MissingField(HOMEWORKS_KEY))?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ValidationError::WrongType(HOMEWORKS_KEY))
}

/// Server-reported timestamp of the response, when it is an integer.
pub fn current_date(payload: &Value) -> Option<i64> {
    payload.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}
