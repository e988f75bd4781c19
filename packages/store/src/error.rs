//! Error types shared by the store, the forms and the widget.

use thiserror::Error;

/// A failure reported by the remote service. The message is shown verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Local validation failures, detected before any remote call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Content is required")]
    EmptyContent,
    #[error("Email is required")]
    EmptyEmail,
    #[error("Password is required")]
    EmptyPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Errors returned by note store operations and form submissions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors from a [`crate::storage::KeyValueStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
