//! Trajectory Intersection Solver
//!
//! This library recovers the single trajectory (3D position and velocity)
//! that can meet every observed moving point at some non-negative time, by
//! eliminating the nonlinear terms of the motion equations into a 6x6 linear
//! system and verifying the rounded result exactly.

pub mod config;
pub mod intersection;
pub mod linsys;
pub mod observations;
pub mod utils;

pub use config::Settings;
pub use intersection::{IntersectionProblem, Solution, SolveError};
pub use observations::{ObservedPoint, Trajectory, Vec3};

use anyhow::Result;

/// Main entry point for solving trajectory intersection problems
pub fn solve_intersection(settings: Settings) -> Result<Solution> {
    let mut problem = IntersectionProblem::new(settings)?;
    problem.solve()
}
