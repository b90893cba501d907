use thiserror::Error;

use crate::Kind;

/// Errors that can occur when borrowing from or returning to a registry.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The operation targeted a kind for which no queue has been registered.
    ///
    /// Registries do not register kinds implicitly. Register every kind before its first use.
    #[error("kind '{kind}' has not been registered")]
    UnregisteredKind {
        /// The kind that the operation was looking for.
        kind: Kind,
    },
}

impl Error {
    pub(crate) fn unregistered(kind: Kind) -> Self {
        Self::UnregisteredKind { kind }
    }
}

/// A specialized `Result` type for registry operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
