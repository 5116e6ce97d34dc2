//! Turns one homework record into the notification text.
use serde_json::Value;
use thiserror::Error;

use crate::model::HomeworkStatus;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Отсутствует ключ \"{0}\".")]
    MissingField(&'static str),
    #[error("Неизвестный статус: {0}")]
    UnknownStatus(String),
}

/// Render the status-change message for `record`.
///
/// `homework_name` must be present and non-null; `status` must be one of the
/// known review codes. A missing status is reported as `UnknownStatus("null")`.
pub fn format(record: &Value) -> Result<String, FormatError> {
    let name = match record.get("homework_name") {
        None | Some(Value::Null) => return Err(FormatError::MissingField("homework_name")),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let status = match record.get("status") {
        Some(Value::String(code)) => code
            .parse::<HomeworkStatus>()
            .map_err(|_| FormatError::UnknownStatus(code.clone()))?,
        Some(other) => return Err(FormatError::UnknownStatus(other.to_string())),
        None => return Err(FormatError::UnknownStatus(Value::Null.to_string())),
    };

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
