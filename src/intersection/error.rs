//! Typed failure conditions for the intersection solve

use std::time::Duration;
use thiserror::Error;

/// The ways a solve can fail once the input has parsed
#[derive(Debug, Error)]
pub enum SolveError {
    /// The observations do not pin down a unique trajectory
    #[error("underdetermined: {0}")]
    Underdetermined(String),

    /// No single trajectory can meet every observed point
    #[error("unsatisfiable: {0}")]
    Unsatisfiable(String),

    /// The float solve produced values that are not integral within epsilon,
    /// or a rounded candidate that fails exact verification
    #[error("precision error: {0}")]
    Precision(String),

    /// The time budget for the solve was exceeded
    #[error("solve exceeded the time budget of {budget:?}")]
    Timeout { budget: Duration },
}
