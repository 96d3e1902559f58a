use thiserror::Error;

/// A result type for design of experiments generation
pub type Result<T> = std::result::Result<T, DoeError>;

/// An error when generating a design matrix
#[derive(Error, Debug)]
pub enum DoeError {
    /// When a design parameter is invalid
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// When the requested design cannot be built (no suitable order, too few candidates...)
    #[error("Infeasible design: {0}")]
    Infeasible(String),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
}
