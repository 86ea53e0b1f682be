use thiserror::Error;

use mx_core::{AgentId, AgentKind, ErrorClass};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("non-finite force or velocity on {0}")]
    NonFinite(AgentId),

    #[error("{id} is a {got} but the collection holds {expected}")]
    KindMismatch {
        id:       AgentId,
        expected: AgentKind,
        got:      AgentKind,
    },

    #[error("agent {0} not found")]
    NotFound(AgentId),
}

impl AgentError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AgentError::NonFinite(_) => ErrorClass::Agent,
            AgentError::KindMismatch { .. } | AgentError::NotFound(_) => ErrorClass::Data,
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
