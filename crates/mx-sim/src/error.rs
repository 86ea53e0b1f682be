use thiserror::Error;
use tracing::{debug, warn};

use mx_agent::AgentError;
use mx_core::{AgentId, ErrorClass, MxError};
use mx_force::ForceError;
use mx_geometry::GeometryError;
use mx_schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] MxError),

    #[error("geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("schedule: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("agent: {0}")]
    Agent(#[from] AgentError),

    #[error("force: {0}")]
    Force(#[from] ForceError),

    #[error("agent {0} is not registered")]
    UnknownAgent(AgentId),
}

impl SimError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SimError::Config(e)       => e.class(),
            SimError::Geometry(e)     => e.class(),
            SimError::Schedule(e)     => e.class(),
            SimError::Agent(e)        => e.class(),
            SimError::Force(e)        => e.class(),
            SimError::UnknownAgent(_) => ErrorClass::Data,
        }
    }

    /// Handle a failure raised mid-tick while working on `agent`.
    ///
    /// Data and agent errors are logged (`warn` and `debug` respectively)
    /// and swallowed so the caller can skip the agent; setup errors come
    /// back out and end the run.
    pub(crate) fn absorb(self, agent: AgentId, what: &'static str) -> SimResult<()> {
        match self.class() {
            ErrorClass::Data => {
                warn!(%agent, error = %self, "{what}");
                Ok(())
            }
            ErrorClass::Agent => {
                debug!(%agent, error = %self, "{what}");
                Ok(())
            }
            ErrorClass::Setup => Err(self),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
