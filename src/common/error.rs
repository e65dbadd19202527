use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Obstacle id space exhausted: all ids in 1..=10 are in use")]
    IdSpaceExhausted,

    #[error("State conflict: {reason}")]
    StateConflict { reason: String },

    #[error("Planning failed: {reason}")]
    PlanningFailed { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Planner error: {0}")]
    Planner(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
