use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate operation: {operation:?} is already registered")]
    DuplicateOperation { operation: String },

    #[error(transparent)]
    Common(#[from] wharf_common::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn duplicate_operation(operation: impl Into<String>) -> Self {
        Self::DuplicateOperation {
            operation: operation.into(),
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
