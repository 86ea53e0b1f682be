use thiserror::Error;

use mx_core::{AgentId, ErrorClass};

#[derive(Debug, Error)]
pub enum ForceError {
    #[error("force on {0} is not finite")]
    NonFinite(AgentId),
}

impl ForceError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Agent
    }
}

pub type ForceResult<T> = Result<T, ForceError>;
