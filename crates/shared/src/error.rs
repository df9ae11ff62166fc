use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SQLSTATE reported when the store cannot parse a date/time value.
pub const INVALID_DATETIME_FORMAT: &str = "22008";
/// SQLSTATE reported when a row-level policy or grant rejects the write.
pub const INSUFFICIENT_PRIVILEGE: &str = "42501";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreErrorKind {
    InvalidDatetimeFormat,
    InsufficientPrivilege,
    Other,
}

/// Structured failure returned by the persistence service.
///
/// Field names follow the PostgREST error body so a response can be decoded directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error(
    "store error {}: {}",
    .code.as_deref().unwrap_or("-"),
    .message.as_deref().unwrap_or("<no message>")
)]
pub struct StoreError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self.code.as_deref() {
            Some(INVALID_DATETIME_FORMAT) => StoreErrorKind::InvalidDatetimeFormat,
            Some(INSUFFICIENT_PRIVILEGE) => StoreErrorKind::InsufficientPrivilege,
            _ => StoreErrorKind::Other,
        }
    }

    /// Message carried by the error, if it is present and non-blank.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }
}
