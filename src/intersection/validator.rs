//! Exact verification of candidate trajectories
//!
//! The float solve only looks at three points; this pass re-checks the rounded
//! integer candidate against every observed point in i128 arithmetic, so a
//! reported solution is never an artifact of float rounding.

use crate::observations::{ObservedPoint, Trajectory};
use rayon::prelude::*;
use std::time::Instant;

/// Validates that a trajectory meets every observed point at a non-negative time
pub struct TrajectoryValidator;

/// Result of validating a trajectory against an observation list
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub checks: Vec<PointCheck>,
    pub metrics: ValidationMetrics,
}

impl ValidationResult {
    /// Meeting times for every point in input order; `None` unless every
    /// point was met
    pub fn meeting_times(&self) -> Option<Vec<f64>> {
        self.checks.iter().map(|c| c.meeting_time).collect()
    }
}

/// Outcome for one observed point
#[derive(Debug, Clone)]
pub struct PointCheck {
    pub index: usize,
    pub point: ObservedPoint,
    /// Meeting time if the point is met; degenerate coincident trajectories meet at 0
    pub meeting_time: Option<f64>,
    pub violation: Option<String>,
}

impl PointCheck {
    pub fn is_met(&self) -> bool {
        self.violation.is_none()
    }
}

/// Performance metrics for validation
#[derive(Debug, Clone)]
pub struct ValidationMetrics {
    pub validation_time_ms: u64,
    pub points_checked: usize,
}

impl TrajectoryValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a trajectory against every observed point
    pub fn validate(&self, trajectory: &Trajectory, points: &[ObservedPoint]) -> ValidationResult {
        let start_time = Instant::now();

        let checks: Vec<PointCheck> = points
            .par_iter()
            .enumerate()
            .map(|(index, point)| Self::check_point(trajectory, index, point))
            .collect();

        let is_valid = checks.iter().all(PointCheck::is_met);

        ValidationResult {
            is_valid,
            checks,
            metrics: ValidationMetrics {
                validation_time_ms: start_time.elapsed().as_millis() as u64,
                points_checked: points.len(),
            },
        }
    }

    /// Exact check of one point: the trajectory meets it at some t >= 0 iff
    /// (point.position - position) = t * (velocity - point.velocity) holds
    /// component-wise for a single non-negative t
    fn check_point(trajectory: &Trajectory, index: usize, point: &ObservedPoint) -> PointCheck {
        let dp = wide_diff(&point.position.components(), &trajectory.position.components());
        let dv = wide_diff(&trajectory.velocity.components(), &point.velocity.components());

        let violation;
        let mut meeting_time = None;

        if dv == [0, 0, 0] {
            // Equal velocities: the lines either coincide everywhere or never meet
            if dp == [0, 0, 0] {
                meeting_time = Some(0.0);
                violation = None;
            } else {
                violation = Some(format!(
                    "point {} moves parallel to the trajectory and never meets it",
                    index
                ));
            }
        } else if cross(dp, dv) != [0, 0, 0] {
            violation = Some(format!(
                "point {} is never collinear with the trajectory",
                index
            ));
        } else {
            // Proportional displacements; read t off any axis with dv != 0
            let axis = (0..3).find(|&a| dv[a] != 0).unwrap_or(0);
            if dp[axis].signum() * dv[axis].signum() < 0 {
                violation = Some(format!(
                    "point {} only meets the trajectory at a negative time",
                    index
                ));
            } else {
                meeting_time = Some(dp[axis] as f64 / dv[axis] as f64);
                violation = None;
            }
        }

        PointCheck {
            index,
            point: *point,
            meeting_time,
            violation,
        }
    }
}

impl Default for TrajectoryValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn wide_diff(a: &[i64; 3], b: &[i64; 3]) -> [i128; 3] {
    [
        a[0] as i128 - b[0] as i128,
        a[1] as i128 - b[1] as i128,
        a[2] as i128 - b[2] as i128,
    ]
}

fn cross(a: [i128; 3], b: [i128; 3]) -> [i128; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
