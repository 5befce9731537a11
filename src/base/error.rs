//! Errors reported by the PR store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User `{0}` is not registered")]
    UnknownUser(String),

    #[error("`{0}` is not a valid event")]
    UnknownEvent(String),

    #[error("`{0}` is not a number")]
    InvalidValue(String),

    #[error("Storage error: {0}")]
    Storage(#[from] surrealdb::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
