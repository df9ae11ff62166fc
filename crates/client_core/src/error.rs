use shared::error::{StoreError, StoreErrorKind};
use thiserror::Error;

pub const MISSING_FIELDS_MESSAGE: &str = "Por favor, preencha todos os campos obrigatórios.";
pub const INCOMPLETE_ANSWERS_MESSAGE: &str =
    "Por favor, responda todas as perguntas antes de enviar.";
pub const DATE_LENGTH_MESSAGE: &str = "Data inválida. Preencha completamente DD/MM/AAAA";
pub const DATE_VALUE_MESSAGE: &str = "Data inválida.";
pub const STORE_DATE_FORMAT_MESSAGE: &str = "Formato de data inválido no banco de dados.";
pub const STORE_PERMISSION_MESSAGE: &str = "Permissão negada. Verifique as políticas do Supabase.";
pub const STORE_FALLBACK_MESSAGE: &str = "Erro no envio: erro desconhecido.";

/// Local checks that run before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{answered} of {required} questions answered")]
    IncompleteAnswers { answered: usize, required: usize },
    #[error("date must have 8 digits, got {digits}")]
    DateLength { digits: usize },
    #[error("date {year:04}-{month:02}-{day:02} does not exist")]
    DateValue { day: u32, month: u32, year: i32 },
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => MISSING_FIELDS_MESSAGE,
            Self::IncompleteAnswers { .. } => INCOMPLETE_ANSWERS_MESSAGE,
            Self::DateLength { .. } => DATE_LENGTH_MESSAGE,
            Self::DateValue { .. } => DATE_VALUE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Text shown in the error banner for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.user_message().to_string(),
            Self::Store(err) => match err.kind() {
                StoreErrorKind::InvalidDatetimeFormat => STORE_DATE_FORMAT_MESSAGE.to_string(),
                StoreErrorKind::InsufficientPrivilege => STORE_PERMISSION_MESSAGE.to_string(),
                StoreErrorKind::Other => err
                    .message()
                    .map_or_else(|| STORE_FALLBACK_MESSAGE.to_string(), str::to_string),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown area '{0}'")]
    UnknownArea(String),
    #[error("unknown subarea '{subarea}' for area '{area}'")]
    UnknownSubarea { area: String, subarea: String },
}
