//! Geometry error type.

use thiserror::Error;

use mx_core::ErrorClass;

/// Errors produced by `mx-geometry`.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{what} needs at least {min} points, got {got}")]
    TooFewPoints {
        what: &'static str,
        min:  usize,
        got:  usize,
    },

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    #[error("duplicate name {0:?}")]
    DuplicateName(String),

    #[error("no crossing or zone matches {0:?}")]
    UnknownDestination(String),
}

impl GeometryError {
    pub fn class(&self) -> ErrorClass {
        match self {
            GeometryError::UnknownDestination(_) => ErrorClass::Data,
            _ => ErrorClass::Setup,
        }
    }
}

pub type GeometryResult<T> = Result<T, GeometryError>;
