use thiserror::Error;

/// Errors that terminate a single point calculation.
///
/// Non-convergence of the SCC cycle within the allowed number of iterations is not part of
/// this enum, it is reported as [ScfStatus::MaxIterationsReached](crate::scc::ScfStatus).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScfError {
    /// A calculator setting is outside of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The structure is empty, inconsistent, or contains an element without parameters.
    #[error("malformed structure: {0}")]
    MalformedStructure(String),
    /// The overlap matrix is not positive definite (linear dependent basis).
    #[error("overlap matrix is singular, smallest eigenvalue: {min_eigenvalue:.3e}")]
    SingularOverlap { min_eigenvalue: f64 },
    /// The chemical potential could not be determined.
    #[error(
        "search for the chemical potential did not converge in {iterations} steps \
         (electron count deviation: {residual:.3e})"
    )]
    OccupationNotConverged { iterations: usize, residual: f64 },
    /// NaN/Inf or a failure of the linear algebra backend.
    #[error("numerical failure: {0}")]
    InternalNumericalFailure(String),
}

impl From<ndarray_linalg::error::LinalgError> for ScfError {
    fn from(err: ndarray_linalg::error::LinalgError) -> Self {
        ScfError::InternalNumericalFailure(err.to_string())
    }
}
