use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Binary answer recorded for a single checklist question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLabel {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOK")]
    Nok,
}

impl AnswerLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Nok => "NOK",
        }
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown answer label '{0}', expected OK or NOK")]
pub struct UnknownAnswerLabel(pub String);

impl FromStr for AnswerLabel {
    type Err = UnknownAnswerLabel;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OK" => Ok(Self::Ok),
            "NOK" => Ok(Self::Nok),
            _ => Err(UnknownAnswerLabel(raw.to_string())),
        }
    }
}

/// Answers keyed by 0-based question index within the selected subarea.
pub type Answers = BTreeMap<usize, AnswerLabel>;

/// Free-text fields of the form. `date` holds the unmasked digits only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub date: String,
    pub collaborator: String,
    pub supervisor: String,
    pub role: String,
}

/// Area/subarea pair; an empty string means "not selected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub area: String,
    pub subarea: String,
}
