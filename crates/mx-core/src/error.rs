//! Framework error type and the error taxonomy shared by every `mx-*` crate.
//!
//! Errors fall into three classes and callers branch on the class rather
//! than on individual variants:
//!
//! | Class   | Typical cause                                  | Handling               |
//! |---------|------------------------------------------------|------------------------|
//! | `Data`  | unresolved entrance/exit/zone, malformed cell  | log, skip the item     |
//! | `Agent` | degenerate vector maths for one agent          | log, skip agent's tick |
//! | `Setup` | unreadable input, zero-length OD period        | refuse to start        |
//!
//! Sub-crates define their own enums and expose a `class()` method mapping
//! into [`ErrorClass`].

use thiserror::Error;

/// Which branch of the error taxonomy an error belongs to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorClass {
    /// Bad input data; the offending row/cell/agent is skipped.
    Data,
    /// A runtime failure isolated to one agent for one tick.
    Agent,
    /// The simulation cannot be initialised.
    Setup,
}

impl ErrorClass {
    /// `true` if the simulation may keep running after this error.
    #[inline]
    pub fn is_recoverable(self) -> bool {
        !matches!(self, ErrorClass::Setup)
    }
}

/// The top-level error type for `mx-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum MxError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MxError {
    pub fn class(&self) -> ErrorClass {
        match self {
            MxError::Parse(_) => ErrorClass::Data,
            MxError::Config(_) | MxError::Io(_) => ErrorClass::Setup,
        }
    }
}

/// Shorthand result type for all `mx-*` crates.
pub type MxResult<T> = Result<T, MxError>;
