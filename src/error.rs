use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeanShiftError {
    #[error("Dimension mismatch: vector {index} has {got} coordinates, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No convergence after {iterations} iterations (last shift {last_shift})")]
    NonConvergence { iterations: usize, last_shift: f64 },

    #[error("Spatial index error: {0}")]
    Index(String),

    #[error("Could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, MeanShiftError>;
