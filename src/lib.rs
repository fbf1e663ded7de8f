#![doc = include_str!("../README.md")]

pub mod reader;
pub mod source;
pub mod state;
pub mod tokens;

use std::error::Error as StdError;

pub use reader::{DEFAULT_MAX_DEPTH, Reader};
pub use source::{TokenSource, ValueType};
pub use state::{Operation, State};

/// A reader error.
///
/// Any error leaves the [`Reader`] in an unspecified state; the traversal must be abandoned.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operation is not legal in the active state.
    ///
    /// This is a programming error in the caller, not a problem with the input.
    #[error("cannot {operation} while in state {state}")]
    InvalidOperation { operation: Operation, state: State },
    /// Objects and arrays are nested deeper than the reader allows.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
    /// A string or byte value is larger than the quota given by the caller.
    #[error("value of {len} bytes exceeds quota of {quota} bytes")]
    QuotaExceeded { quota: usize, len: usize },
    /// The token source found a different token than the one requested.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },
    /// A numeric value does not fit into the requested type.
    #[error("number {value} does not fit into {target}")]
    NumberOutOfRange { target: &'static str, value: String },
    /// The token source ran out of tokens.
    #[error("unexpected end of tokens")]
    UnexpectedEnd,
    /// A failure reported by a token source.
    #[error("token source error: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wraps a token source specific error.
    pub fn token_source<E: Into<Box<dyn StdError + Send + Sync>>>(error: E) -> Self {
        Error::Source(error.into())
    }

    /// Returns whether the error was caused by misuse of the navigation API.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Error::InvalidOperation { .. })
    }
}
