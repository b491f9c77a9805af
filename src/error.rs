use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    AmbiguousRef,
    StorageError,
    ImportFormatError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::StorageError => "STORAGE_ERROR",
            Self::ImportFormatError => "IMPORT_FORMAT_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct LifeorgError {
    pub code: ErrorCode,
    pub message: String,
}

impl LifeorgError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Task not found: {reference}"))
    }

    pub fn habit_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Habit not found: {reference}"))
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn confirmation_required(action: &str) -> Self {
        Self::validation(format!(
            "{action} replaces or deletes existing data. Re-run with --yes to confirm."
        ))
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    pub fn import_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ImportFormatError, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }
}

impl From<rusqlite::Error> for LifeorgError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<std::io::Error> for LifeorgError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}
