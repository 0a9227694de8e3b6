//! Homework statuses and their verdicts

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::StatusError;

/// Review status reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses.
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Wire symbol of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Localized verdict sentence shown to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw status symbol to its verdict.
pub fn describe(symbol: &str) -> Result<&'static str, StatusError> {
    symbol.parse::<HomeworkStatus>().map(|status| status.verdict())
}

/// A single homework entry of the API payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    pub name: String,
    pub status: HomeworkStatus,
}

impl HomeworkRecord {
    /// Interpret one element of the `homeworks` list.
    ///
    /// Records with a status outside the known set are rejected.
    pub fn from_value(value: &Value) -> Result<Self, StatusError> {
        let record = value.as_object().ok_or(StatusError::RecordNotAMapping)?;

        let name = record
            .get("homework_name")
            .and_then(Value::as_str)
            .ok_or(StatusError::MissingField("homework_name"))?;

        let status = match record.get("status") {
            Some(Value::String(s)) => s.parse::<HomeworkStatus>()?,
            Some(other) => return Err(StatusError::UnknownStatus(other.to_string())),
            None => return Err(StatusError::MissingField("status")),
        };

        Ok(Self {
            name: name.to_string(),
            status,
        })
    }

    /// Notification text announcing the current status.
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}
