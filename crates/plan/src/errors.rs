use planbox_doe::DoeError;
use thiserror::Error;

/// A result type for experiment plan generation
pub type Result<T> = std::result::Result<T, PlanError>;

/// An error when building an experiment plan
#[derive(Error, Debug)]
pub enum PlanError {
    /// When a factor declaration (or the factor set) is malformed
    #[error("Invalid factor: {0}")]
    InvalidFactor(String),
    /// When a factor does not fulfill the structural requirement of a strategy
    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),
    /// When the design matrix provider cannot produce the requested matrix
    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] DoeError),
    /// When the requested method is not known
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
    /// When the configuration misses or misuses an option of the strategy
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
