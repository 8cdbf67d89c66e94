//! Solution representation for trajectory intersection problems

use crate::config::SolverBackend;
use crate::observations::Trajectory;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A solved intersection problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The unique trajectory meeting every observed point
    pub trajectory: Trajectory,
    /// Meeting time for each observed point, in input order
    pub meeting_times: Vec<f64>,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
    /// Metadata about how the solution was obtained
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// The puzzle scalar: sum of the solved position components
    pub position_sum: i64,
    /// Number of observed points in the input
    pub points_total: usize,
    /// Indices of the point triple whose equations produced the solution
    pub pivot_points: [usize; 3],
    /// Linear backend that solved the system
    pub backend: SolverBackend,
    /// Largest float residual of the solved 6x6 system
    pub max_residual: f64,
}

impl Solution {
    pub fn new(
        trajectory: Trajectory,
        meeting_times: Vec<f64>,
        solve_time: Duration,
        metadata: SolutionMetadata,
    ) -> Self {
        Self {
            trajectory,
            meeting_times,
            solve_time,
            metadata,
        }
    }

    /// The reported scalar: px + py + pz of the solved position
    pub fn position_sum(&self) -> i64 {
        self.trajectory.position_sum()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self
            .to_json()
            .context("Failed to serialize solution to JSON")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write solution to {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Compact summary for tables and logs
    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            position_sum: self.position_sum(),
            trajectory: self.trajectory,
            points_total: self.metadata.points_total,
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }
}

/// Compact solution summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub position_sum: i64,
    pub trajectory: Trajectory,
    pub points_total: usize,
    pub solve_time_ms: u64,
}
