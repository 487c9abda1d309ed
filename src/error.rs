use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Stored JSON is missing or corrupt; callers fall back to defaults
    #[error("STORAGE_READ: {0}")]
    StorageRead(String),
    /// The storage backend refused a write (quota, private mode, ...)
    #[error("STORAGE_WRITE: {0}")]
    StorageWrite(String),
    /// An imported or restored payload is not a valid persisted state
    #[error("VALIDATION: {0}")]
    Validation(String),
    /// The user declined a destructive confirmation
    #[error("CANCELLED: {0}")]
    Cancelled(String),
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
