use thiserror::Error;

use mx_behavior::BehaviorError;
use mx_core::ErrorClass;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OD matrix period must be positive, got {0}")]
    ZeroPeriod(f64),

    #[error("OD cell ({row}, {col}) is outside the matrix")]
    CellOutOfRange { row: usize, col: usize },

    #[error("no distribution row for {0:?}")]
    RowNotFound(String),

    #[error("no distribution column in row {row:?} covers draw {draw}")]
    NoColumn { row: String, draw: f64 },

    #[error("distribution row {row:?} has no column {destination:?}")]
    UnknownColumn { row: String, destination: String },

    #[error("distribution row {0:?} is not a cumulative percentage")]
    NotCumulative(String),

    #[error("behavior template: {0}")]
    Template(#[from] BehaviorError),
}

impl ScheduleError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ScheduleError::Parse(_) | ScheduleError::Io(_) | ScheduleError::ZeroPeriod(_) => {
                ErrorClass::Setup
            }
            _ => ErrorClass::Data,
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
