use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by task store commands
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task name is required")]
    EmptyName,

    #[error("no task at position {0}")]
    TaskOutOfRange(usize),

    #[error("no category at position {0}")]
    CategoryOutOfRange(usize),

    #[error("category name is required")]
    EmptyCategoryName,

    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("category '{0}' does not exist")]
    UnknownCategory(String),

    #[error("the default category '-' cannot be deleted")]
    DefaultCategoryProtected,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode task data: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Validation problems the user can fix, as opposed to persistence failures
    pub fn is_user_error(&self) -> bool {
        !matches!(self, StoreError::Io { .. } | StoreError::Json(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
