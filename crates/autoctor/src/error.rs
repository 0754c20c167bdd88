//! Errors surfaced by [`construct`](crate::construct) and by constructor bodies.

use thiserror::Error;

use crate::{MockError, TypeKey};

/// Boxed cause returned by a constructor body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why an instance could not be built.
///
/// These are the only failure modes of instantiation; nothing is retried and
/// no partially built instance is ever returned.
#[derive(Debug, Error)]
pub enum InstantiateError {
    /// The descriptor declares no constructor at all (an interface or other
    /// abstract type).
    #[error("type `{ty}` has no accessible constructor")]
    NoAccessibleConstructor { ty: &'static str },

    /// A supplied candidate matched none of the chosen constructor's
    /// parameters, which usually means the constructor's dependencies changed
    /// and the test setup is stale.
    #[error(
        "{unused} supplied candidate(s) were never used (first: `{ty}`); \
         did the constructor's dependencies change?"
    )]
    UnusedCandidate { ty: TypeKey, unused: usize },

    /// The chosen constructor could not be invoked or failed while running.
    #[error("failed to construct `{ty}`")]
    ConstructionFailed {
        ty: &'static str,
        #[source]
        source: ConstructError,
    },
}

impl InstantiateError {
    /// The underlying construction failure, if this is `ConstructionFailed`.
    pub fn construct_error(&self) -> Option<&ConstructError> {
        match self {
            InstantiateError::ConstructionFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure while preparing arguments for, or running, a constructor.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// The constructor body returned an error.
    #[error("constructor returned an error")]
    Target(#[source] BoxError),

    /// The constructor body panicked.
    #[error("constructor panicked: {message}")]
    Panicked { message: String },

    /// The type cannot be instantiated (e.g. it only exists as an abstraction).
    #[error("`{ty}` is abstract and cannot be instantiated")]
    Abstract { ty: &'static str },

    /// An argument was read as a type it is not assignable to.
    #[error("argument {index} is `{found}`, but `{expected}` was requested")]
    ArgumentMismatch {
        index: usize,
        expected: TypeKey,
        found: TypeKey,
    },

    /// An argument index past the end of the argument list was read.
    #[error("argument {index} was requested but not supplied")]
    MissingArgument { index: usize },

    /// The argument list length does not match the constructor's parameters.
    #[error("constructor takes {expected} argument(s), {found} supplied")]
    ArityMismatch { expected: usize, found: usize },

    /// The mock factory could not supply a dependency.
    #[error("mock factory failed")]
    Mock(#[from] MockError),
}

impl ConstructError {
    /// Wrap an error raised by a constructor body.
    ///
    /// Handy with `map_err`: `Service::try_new(db).map_err(ConstructError::target)`.
    pub fn target(err: impl Into<BoxError>) -> Self {
        ConstructError::Target(err.into())
    }
}
