//! Custom error types used in platformvm-types.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Backing errors for all primitive-type operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("failed to pack/unpack bytes (message: {message:?})")]
    Packing { message: String },
    #[error("failed for other reasons (message: {message:?}, retryable: {retryable:?})")]
    Other { message: String, retryable: bool },
}

impl Error {
    /// Returns the error message in "String".
    #[inline]
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Error::Packing { message } | Error::Other { message, .. } => message.clone(),
        }
    }

    /// Returns if the error is retryable.
    #[inline]
    #[must_use]
    pub fn retryable(&self) -> bool {
        match self {
            Error::Packing { .. } => false,
            Error::Other { retryable, .. } => *retryable,
        }
    }

    /// Returns true if the error message contains the substring.
    #[inline]
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.message().contains(s)
    }
}
