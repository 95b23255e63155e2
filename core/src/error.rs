use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Record load failed: {0}")]
    LoadFailed(String),

    #[error("A record load is already in progress")]
    LoadInProgress,

    #[error("Action {0} is reserved for the load boundary")]
    LoadActionRejected(&'static str),

    #[error("Unknown state or territory code '{0}'")]
    InvalidStateCode(String),

    #[error("Duplicate record id '{0}'")]
    DuplicateRecordId(String),

    #[error("Invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
