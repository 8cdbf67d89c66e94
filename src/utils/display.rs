//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::intersection::{Solution, ValidationResult};
use anyhow::{Context, Result};
use std::path::Path;

/// Formats solutions for console output and files
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a solution for console output
    pub fn format_solution(solution: &Solution, show_meeting_times: bool) -> String {
        let mut output = String::new();

        output.push_str("=== Solution ===\n");
        output.push_str(&format!("Trajectory: {}\n", solution.trajectory));
        output.push_str(&format!("Position sum: {}\n", solution.position_sum()));
        output.push_str(&format!(
            "Solve Time: {:.3}s\n",
            solution.solve_time.as_secs_f64()
        ));
        output.push_str(&format!(
            "Observed points: {} (pivot triple: {:?})\n",
            solution.metadata.points_total, solution.metadata.pivot_points
        ));
        output.push_str(&format!(
            "Backend: {:?}, max residual: {:.3e}\n",
            solution.metadata.backend, solution.metadata.max_residual
        ));

        if show_meeting_times {
            output.push_str("\nMeeting times:\n");
            for (i, t) in solution.meeting_times.iter().enumerate() {
                output.push_str(&format!("  point {:3}: t = {}\n", i, t));
            }
        }

        output
    }

    /// Format a validation report for console output
    pub fn format_validation(result: &ValidationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Checked {} point(s) in {}ms\n",
            result.metrics.points_checked, result.metrics.validation_time_ms
        ));

        for check in &result.checks {
            match (&check.violation, check.meeting_time) {
                (Some(violation), _) => {
                    output.push_str(&format!("  point {:3}: FAIL - {}\n", check.index, violation));
                }
                (None, Some(t)) => {
                    output.push_str(&format!("  point {:3}: met at t = {}\n", check.index, t));
                }
                (None, None) => {}
            }
        }

        output
    }

    /// Save a solution to the output directory in the configured format
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        match format {
            OutputFormat::Text => {
                let filepath = output_dir.join("solution.txt");
                let content = Self::format_solution(solution, true);
                std::fs::write(&filepath, content)
                    .with_context(|| format!("Failed to write {}", filepath.display()))?;
            }
            OutputFormat::Json => {
                let filepath = output_dir.join("solution.json");
                solution.save_to_file(&filepath)?;

                let summary_path = output_dir.join("solution_summary.json");
                let summary_json = serde_json::to_string_pretty(&solution.summary())?;
                std::fs::write(summary_path, summary_json)?;
            }
        }

        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with an ANSI color (if the terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverBackend;
    use crate::intersection::{SolutionMetadata, TrajectoryValidator};
    use crate::observations::{parse_observations, Trajectory, Vec3};
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample_solution() -> Solution {
        Solution::new(
            Trajectory::new(Vec3::new(24, 13, 10), Vec3::new(-3, 1, 2)),
            vec![5.0, 3.0, 4.0],
            Duration::from_millis(7),
            SolutionMetadata {
                position_sum: 47,
                points_total: 3,
                pivot_points: [0, 1, 2],
                backend: SolverBackend::Lu,
                max_residual: 1e-12,
            },
        )
    }

    #[test]
    fn test_format_solution() {
        let text = SolutionFormatter::format_solution(&sample_solution(), true);
        assert!(text.contains("Position sum: 47"));
        assert!(text.contains("24, 13, 10 @ -3, 1, 2"));
        assert!(text.contains("t = 5"));
    }

    #[test]
    fn test_format_validation() {
        let points = parse_observations("19, 13, 30 @ -2, 1, -2\n").unwrap();
        let trajectory = Trajectory::new(Vec3::new(24, 13, 10), Vec3::new(-3, 1, 2));
        let result = TrajectoryValidator::new().validate(&trajectory, &points);

        let text = SolutionFormatter::format_validation(&result);
        assert!(text.contains("met at t = 5"));
    }

    #[test]
    fn test_save_solution_formats() {
        let temp_dir = tempdir().unwrap();
        let solution = sample_solution();

        SolutionFormatter::save_solution(&solution, temp_dir.path(), &OutputFormat::Text).unwrap();
        assert!(temp_dir.path().join("solution.txt").exists());

        SolutionFormatter::save_solution(&solution, temp_dir.path(), &OutputFormat::Json).unwrap();
        assert!(temp_dir.path().join("solution.json").exists());
        assert!(temp_dir.path().join("solution_summary.json").exists());
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
