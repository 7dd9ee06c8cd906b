//! Error taxonomy for scheduler operations.

/// Errors surfaced by the scheduler and its stores.
#[derive(Debug, thiserror::Error)]
pub enum MemorizationError {
    /// Malformed or out-of-range input, rejected before touching storage.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A review was recorded against a verse the user is not memorizing.
    #[error("verse {chapter}.{verse} is not being memorized by user {user}")]
    ItemNotFound {
        user: String,
        chapter: u32,
        verse: u32,
    },

    /// The persistence backend could not complete the operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl MemorizationError {
    /// Whether retrying the whole operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<rusqlite::Error> for MemorizationError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MemorizationError>;
