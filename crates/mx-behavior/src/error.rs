use thiserror::Error;

use mx_core::ErrorClass;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior template has no segments")]
    EmptyTemplate,

    #[error("segment {0} has no waypoints")]
    EmptySegment(usize),

    #[error("segment {segment} mixes states {first} and {second}")]
    ConflictingState {
        segment: usize,
        first:   String,
        second:  String,
    },

    #[error("unknown agent state {0:?}")]
    UnknownState(String),
}

impl BehaviorError {
    /// Malformed templates are data errors: the row or cell carrying them is
    /// skipped.
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Data
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
