//! Intersection problem definition, solution handling, and validation

pub mod error;
pub mod problem;
pub mod solution;
pub mod validator;

pub use error::SolveError;
pub use problem::{IntersectionProblem, SolvabilityEstimate, SolvabilityLikelihood};
pub use solution::{Solution, SolutionMetadata, SolutionSummary};
pub use validator::{PointCheck, TrajectoryValidator, ValidationResult};
