use crate::{
    config::ConfigError, cursor::CursorError, key::KeyError, value::CompareError,
};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured error with a stable classification, returned by the
/// composite entry points that cross more than one concern.
/// Leaf operations return their own concern error, which converts into this.
///

#[derive(Debug, ThisError)]
#[error("{origin}: {message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self.class,
            ErrorClass::TypeMismatch | ErrorClass::MissingInput | ErrorClass::InvalidConfig
        )
    }
}

///
/// ErrorClass
/// (what happened)
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    #[display("type_mismatch")]
    TypeMismatch,
    #[display("missing_input")]
    MissingInput,
    #[display("invalid_config")]
    InvalidConfig,
    #[display("invariant_violation")]
    InvariantViolation,
    #[display("unsupported")]
    Unsupported,
}

///
/// ErrorOrigin
/// (where it happened)
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorOrigin {
    #[display("compare")]
    Compare,
    #[display("config")]
    Config,
    #[display("cursor")]
    Cursor,
    #[display("key")]
    Key,
}

impl From<CompareError> for Error {
    fn from(err: CompareError) -> Self {
        Self::new(err.class(), ErrorOrigin::Compare, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::InvalidConfig, ErrorOrigin::Config, err.to_string())
    }
}

impl From<KeyError> for Error {
    fn from(err: KeyError) -> Self {
        Self::new(ErrorClass::MissingInput, ErrorOrigin::Key, err.to_string())
    }
}

impl From<CursorError> for Error {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::Compare(inner) => inner.into(),
            other => Self::new(other.class(), ErrorOrigin::Cursor, other.to_string()),
        }
    }
}
