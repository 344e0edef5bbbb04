use thiserror::Error;

pub mod app_error;
pub mod store_error;

pub use app_error::AppError;
pub use store_error::StoreError;

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

/// Coarse classification of an error, used by adapters to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out of range input. Nothing was mutated.
    InvalidInput,
    /// The player has never submitted a score.
    NotFound,
    /// Broken invariant or infrastructure failure.
    Internal,
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::App(_) => ErrorKind::InvalidInput,
            ApplicationError::Store(StoreError::PlayerNotFound(_)) => ErrorKind::NotFound,
            ApplicationError::Store(_) => ErrorKind::Internal,
            ApplicationError::Infrastructure(_) => ErrorKind::Internal,
        }
    }
}
