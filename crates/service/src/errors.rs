use models::errors::ModelError;
use thiserror::Error;

/// Outcome classes of the user operations.
///
/// The store adapter decides between `DuplicateKey` and `Store`; the service
/// decides `Validation` and `NotFound`. Display yields the underlying message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    DuplicateKey(String),
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    Store(String),
}

impl From<ModelError> for UserError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Duplicate(msg) => UserError::DuplicateKey(msg),
            ModelError::Db(msg) => UserError::Store(msg),
        }
    }
}
