//! Notification wording. The verdict sentences are user-facing data and are
//! kept exactly as the recipients know them.

use crate::{StatusCode, TrackedItem};

pub const VERDICT_APPROVED: &str = "Работа проверена: ревьюеру всё понравилось. Ура!";
pub const VERDICT_REVIEWING: &str = "Работа взята на проверку ревьюером.";
pub const VERDICT_REJECTED: &str = "Работа проверена: у ревьюера есть замечания.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unknown homework status: {0}")]
    UnknownStatus(String),
}

/// Verdict sentence for a recognized status.
pub fn verdict(status: &StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::Approved => Some(VERDICT_APPROVED),
        StatusCode::Reviewing => Some(VERDICT_REVIEWING),
        StatusCode::Rejected => Some(VERDICT_REJECTED),
        StatusCode::Unknown(_) => None,
    }
}

/// Status-change notification for `item`.
pub fn format_status(item: &TrackedItem) -> Result<String, FormatError> {
    let verdict = verdict(&item.status)
        .ok_or_else(|| FormatError::UnknownStatus(item.status.as_str().to_string()))?;
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        item.name, verdict
    ))
}

/// Alert sent when a cycle fails.
pub fn failure_message(description: &str) -> String {
    format!("Сбой в работе программы: {description}")
}

/// Alert for a status outside the verdict table, sent only when enabled.
pub fn undetermined_status_message(item: &TrackedItem) -> String {
    format!(
        "Не удалось определить статус работы \"{}\": {}",
        item.name, item.status
    )
}
