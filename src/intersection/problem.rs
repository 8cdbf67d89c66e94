//! Trajectory intersection problem definition

use super::{Solution, SolutionMetadata, SolveError, TrajectoryValidator};
use crate::config::Settings;
use crate::linsys::{triple_system, LinearSolution, UnifiedLinearSolver};
use crate::observations::{load_observations_from_file, ObservedPoint, Trajectory, Vec3};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// A trajectory intersection problem over a fixed list of observed points
pub struct IntersectionProblem {
    settings: Settings,
    points: Vec<ObservedPoint>,
    validator: TrajectoryValidator,
}

impl IntersectionProblem {
    /// Create a new problem, loading observations from the configured file
    pub fn new(settings: Settings) -> Result<Self> {
        let points = load_observations_from_file(&settings.input.observations_file)
            .context("Failed to load observations file")?;

        Ok(Self::with_points(settings, points))
    }

    /// Create a problem with an explicit observation list (useful for testing)
    pub fn with_points(settings: Settings, points: Vec<ObservedPoint>) -> Self {
        Self {
            settings,
            points,
            validator: TrajectoryValidator::new(),
        }
    }

    /// Solve the intersection problem for the unique trajectory meeting every
    /// observed point at a non-negative time
    pub fn solve(&mut self) -> Result<Solution> {
        let start_time = Instant::now();
        let budget = Duration::from_secs(self.settings.solver.timeout_seconds);

        if self.points.len() < 3 {
            return Err(SolveError::Underdetermined(format!(
                "{} observed point(s); at least 3 independent points are required",
                self.points.len()
            ))
            .into());
        }

        let solver = UnifiedLinearSolver::new(
            self.settings.solver.backend,
            self.settings.solver.pivot_epsilon,
        );

        // Solve in coordinates relative to the first observed position.
        // Absolute puzzle coordinates can exceed f64's integer range, while
        // the offsets between observations (and from them to the unknown
        // position) stay small enough to round cleanly. Velocities are
        // unaffected by the translation.
        let origin = self.points[0].position;
        let shifted: Vec<ObservedPoint> = self
            .points
            .iter()
            .map(|p| ObservedPoint::new(p.position - origin, p.velocity))
            .collect();

        // Find the first point triple whose eliminated equations form a
        // non-singular system; degenerate triples are skipped.
        let (pivot, linear) = self
            .find_solvable_triple(&shifted, &solver, start_time, budget)?
            .ok_or_else(|| {
                SolveError::Underdetermined(
                    "every point triple is degenerate (parallel or dependent trajectories)"
                        .to_string(),
                )
            })?;

        let relative = self.round_to_trajectory(&linear)?;
        let trajectory = Trajectory::new(relative.position + origin, relative.velocity);

        // Exact check of the rounded candidate against all points, pivot
        // triple included.
        let validation = self.validator.validate(&trajectory, &self.points);
        if !validation.is_valid {
            let failed: Vec<&str> = validation
                .checks
                .iter()
                .filter_map(|c| c.violation.as_deref())
                .collect();
            let message = failed.join("; ");

            let pivot_broken = validation
                .checks
                .iter()
                .any(|c| !c.is_met() && pivot.contains(&c.index));
            if pivot_broken {
                // The float solve accepted this triple, so the integer
                // candidate can only have been damaged by rounding.
                return Err(SolveError::Precision(message).into());
            }
            return Err(SolveError::Unsatisfiable(message).into());
        }

        // A valid result carries a meeting time for every point
        let meeting_times = validation
            .meeting_times()
            .context("validated result is missing a meeting time")?;

        let metadata = SolutionMetadata {
            position_sum: trajectory.position_sum(),
            points_total: self.points.len(),
            pivot_points: pivot,
            backend: solver.backend(),
            max_residual: linear.residual,
        };

        Ok(Solution::new(
            trajectory,
            meeting_times,
            start_time.elapsed(),
            metadata,
        ))
    }

    fn find_solvable_triple(
        &self,
        points: &[ObservedPoint],
        solver: &UnifiedLinearSolver,
        start_time: Instant,
        budget: Duration,
    ) -> Result<Option<([usize; 3], LinearSolution)>> {
        for (i, j, k) in (0..points.len()).tuple_combinations() {
            if start_time.elapsed() > budget {
                return Err(SolveError::Timeout { budget }.into());
            }

            let (matrix, rhs) = triple_system(&points[i], &points[j], &points[k]);
            if let Some(linear) = solver.solve(&matrix, &rhs) {
                return Ok(Some(([i, j, k], linear)));
            }
        }

        Ok(None)
    }

    /// Round the six float unknowns (origin-relative position, velocity) to
    /// integers, failing if any component is farther than the configured
    /// epsilon from integral
    fn round_to_trajectory(&self, linear: &LinearSolution) -> Result<Trajectory> {
        let epsilon = self.settings.solver.integer_epsilon;
        let mut rounded = [0i64; 6];

        for (idx, &value) in linear.values.iter().enumerate() {
            let nearest = value.round();
            if (value - nearest).abs() > epsilon {
                return Err(SolveError::Precision(format!(
                    "solved component {} = {} is not within {} of an integer",
                    idx, value, epsilon
                ))
                .into());
            }
            rounded[idx] = nearest as i64;
        }

        Ok(Trajectory::new(
            Vec3::new(rounded[0], rounded[1], rounded[2]),
            Vec3::new(rounded[3], rounded[4], rounded[5]),
        ))
    }

    /// Get the observed points
    pub fn points(&self) -> &[ObservedPoint] {
        &self.points
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Cheap structural check of whether the observations can pin down a
    /// unique trajectory
    pub fn estimate_solvability(&self) -> SolvabilityEstimate {
        let total_points = self.points.len();

        let parallel_velocity_pairs = self
            .points
            .iter()
            .tuple_combinations()
            .filter(|(a, b)| a.velocity.is_parallel_to(&b.velocity))
            .count();

        let distinct_velocities = self
            .points
            .iter()
            .map(|p| p.velocity)
            .collect::<HashSet<_>>()
            .len();

        let likelihood = if total_points < 3 || distinct_velocities < 3 {
            SolvabilityLikelihood::Low
        } else if parallel_velocity_pairs == 0 {
            SolvabilityLikelihood::High
        } else {
            SolvabilityLikelihood::Medium
        };

        SolvabilityEstimate {
            likelihood,
            total_points,
            parallel_velocity_pairs,
            distinct_velocities,
        }
    }
}

/// Estimate of whether the observations determine a unique trajectory
#[derive(Debug, Clone)]
pub struct SolvabilityEstimate {
    pub likelihood: SolvabilityLikelihood,
    pub total_points: usize,
    pub parallel_velocity_pairs: usize,
    pub distinct_velocities: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvabilityLikelihood {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for SolvabilityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solvability Estimate:")?;
        writeln!(f, "  Likelihood: {:?}", self.likelihood)?;
        writeln!(f, "  Observed points: {}", self.total_points)?;
        writeln!(f, "  Distinct velocities: {}", self.distinct_velocities)?;
        writeln!(
            f,
            "  Parallel velocity pairs: {}",
            self.parallel_velocity_pairs
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverBackend;
    use crate::observations::parse_observations;

    fn fixture_points() -> Vec<ObservedPoint> {
        parse_observations(
            "19, 13, 30 @ -2, 1, -2\n\
             18, 19, 22 @ -1, -1, -2\n\
             20, 25, 34 @ -2, -2, -4\n\
             12, 31, 28 @ -1, -2, -1\n\
             20, 19, 15 @ 1, -5, -3\n",
        )
        .unwrap()
    }

    fn solve_points(points: Vec<ObservedPoint>) -> Result<Solution> {
        IntersectionProblem::with_points(Settings::default(), points).solve()
    }

    fn expect_error(result: Result<Solution>) -> SolveError {
        result
            .unwrap_err()
            .downcast::<SolveError>()
            .expect("expected a typed SolveError")
    }

    #[test]
    fn test_fixture_scenario() {
        let solution = solve_points(fixture_points()).unwrap();

        assert_eq!(solution.trajectory.position, Vec3::new(24, 13, 10));
        assert_eq!(solution.trajectory.velocity, Vec3::new(-3, 1, 2));
        assert_eq!(solution.position_sum(), 47);
        assert_eq!(solution.meeting_times, vec![5.0, 3.0, 4.0, 6.0, 1.0]);
        assert_eq!(solution.metadata.points_total, 5);
    }

    #[test]
    fn test_three_points_suffice() {
        let solution = solve_points(fixture_points()[..3].to_vec()).unwrap();
        assert_eq!(solution.position_sum(), 47);
    }

    #[test]
    fn test_both_backends_agree() {
        for backend in [SolverBackend::Lu, SolverBackend::Elimination] {
            let mut settings = Settings::default();
            settings.solver.backend = backend;
            let solution = IntersectionProblem::with_points(settings, fixture_points())
                .solve()
                .unwrap();
            assert_eq!(solution.position_sum(), 47);
            assert_eq!(solution.metadata.backend, backend);
        }
    }

    #[test]
    fn test_idempotence() {
        let mut problem = IntersectionProblem::with_points(Settings::default(), fixture_points());
        let first = problem.solve().unwrap();
        let second = problem.solve().unwrap();

        assert_eq!(first.trajectory, second.trajectory);
        assert_eq!(first.meeting_times, second.meeting_times);
    }

    #[test]
    fn test_order_independence() {
        let mut reversed = fixture_points();
        reversed.reverse();

        let solution = solve_points(reversed).unwrap();
        assert_eq!(solution.trajectory.position, Vec3::new(24, 13, 10));
        assert_eq!(solution.trajectory.velocity, Vec3::new(-3, 1, 2));
    }

    #[test]
    fn test_redundant_consistent_point_tolerated() {
        let mut points = fixture_points();
        // Meets the known trajectory at t = 2: position 18, 15, 14
        points.push(ObservedPoint::new(Vec3::new(20, 17, 16), Vec3::new(-1, -1, -1)));

        let solution = solve_points(points).unwrap();
        assert_eq!(solution.position_sum(), 47);
        assert_eq!(solution.meeting_times[5], 2.0);
    }

    #[test]
    fn test_inconsistent_point_is_unsatisfiable() {
        let mut points = fixture_points();
        points.push(ObservedPoint::new(Vec3::new(0, 0, 0), Vec3::new(1, 1, 1)));

        let error = expect_error(solve_points(points));
        assert!(matches!(error, SolveError::Unsatisfiable(_)));
    }

    #[test]
    fn test_too_few_points_underdetermined() {
        let error = expect_error(solve_points(fixture_points()[..2].to_vec()));
        assert!(matches!(error, SolveError::Underdetermined(_)));
    }

    #[test]
    fn test_parallel_velocities_underdetermined() {
        let points = parse_observations(
            "0, 0, 0 @ 1, 2, 3\n\
             10, 0, 0 @ 1, 2, 3\n\
             0, 10, 0 @ 1, 2, 3\n\
             0, 0, 10 @ 1, 2, 3\n",
        )
        .unwrap();

        let error = expect_error(solve_points(points));
        assert!(matches!(error, SolveError::Underdetermined(_)));
    }

    #[test]
    fn test_degenerate_triple_skipped() {
        // Insert a consistent point sharing the first point's velocity.
        // Every triple containing both is singular, so the search has to
        // skip past it rather than abort.
        let mut points = fixture_points();
        let filler = ObservedPoint::new(Vec3::new(22, 13, 18), Vec3::new(-2, 1, -2));
        points.insert(1, filler);

        let solution = solve_points(points).unwrap();
        assert_eq!(solution.position_sum(), 47);
        assert_eq!(solution.meeting_times[1], 2.0);
        // The pivot triple cannot contain both equal-velocity points
        let pivot = solution.metadata.pivot_points;
        assert!(!(pivot.contains(&0) && pivot.contains(&1)));
    }

    /// Build observations meeting `trajectory` at the given times with the
    /// given velocities: the observed position at time zero is
    /// P + t * (V - v)
    fn synthetic_points(trajectory: &Trajectory, meetings: &[(i64, Vec3)]) -> Vec<ObservedPoint> {
        meetings
            .iter()
            .map(|&(t, v)| {
                let position = Vec3::new(
                    trajectory.position.x + t * (trajectory.velocity.x - v.x),
                    trajectory.position.y + t * (trajectory.velocity.y - v.y),
                    trajectory.position.z + t * (trajectory.velocity.z - v.z),
                );
                ObservedPoint::new(position, v)
            })
            .collect()
    }

    #[test]
    fn test_large_coordinate_positions() {
        // Positions at the magnitude of real inputs exceed f64's exact
        // integer range; solving relative to the first observation keeps the
        // unknowns small enough to round cleanly.
        let expected = Trajectory::new(
            Vec3::new(100_000_000_000_000, 200_000_000_000_000, 300_000_000_000_000),
            Vec3::new(-50, 30, 20),
        );
        let points = synthetic_points(
            &expected,
            &[
                (10, Vec3::new(100, -40, -30)),
                (20, Vec3::new(-20, 70, 10)),
                (30, Vec3::new(60, -10, -70)),
                (40, Vec3::new(-90, 50, 40)),
            ],
        );

        for backend in [SolverBackend::Lu, SolverBackend::Elimination] {
            let mut settings = Settings::default();
            settings.solver.backend = backend;
            let solution = IntersectionProblem::with_points(settings, points.clone())
                .solve()
                .unwrap();

            assert_eq!(solution.trajectory, expected);
            assert_eq!(solution.position_sum(), 600_000_000_000_000);
            assert_eq!(solution.meeting_times, vec![10.0, 20.0, 30.0, 40.0]);
        }
    }

    #[test]
    fn test_fractional_solution_is_precision_error() {
        // These three observations are pinned down by a unique trajectory
        // with a fractional position, 0.5, 0, 0 @ 1, 0, 0: they pass through
        // 1, 0, 0 at t = 1/2, 2, 0, 0 at t = 3/2 and 3, 0, 0 at t = 5/2.
        let points = parse_observations(
            "1, -1, -2 @ 0, 2, 4\n\
             -4, 0, -3 @ 4, 0, 2\n\
             -2, 5, 0 @ 2, -2, 0\n",
        )
        .unwrap();

        let error = expect_error(solve_points(points));
        assert!(matches!(error, SolveError::Precision(_)));
    }

    #[test]
    fn test_non_integral_component_rejected_by_rounding() {
        let problem = IntersectionProblem::with_points(Settings::default(), fixture_points());
        let linear = LinearSolution {
            values: nalgebra::Vector6::new(24.5, 13.0, 10.0, -3.0, 1.0, 2.0),
            residual: 0.0,
        };

        let error = problem
            .round_to_trajectory(&linear)
            .unwrap_err()
            .downcast::<SolveError>()
            .unwrap();
        assert!(matches!(error, SolveError::Precision(_)));
    }

    #[test]
    fn test_zero_budget_times_out() {
        // `with_points` bypasses settings validation, so an empty time
        // budget reaches the triple search directly.
        let mut settings = Settings::default();
        settings.solver.timeout_seconds = 0;

        let error = expect_error(
            IntersectionProblem::with_points(settings, fixture_points()).solve(),
        );
        assert!(matches!(error, SolveError::Timeout { .. }));
    }

    #[test]
    fn test_solvability_estimate() {
        let problem = IntersectionProblem::with_points(Settings::default(), fixture_points());
        let estimate = problem.estimate_solvability();
        assert_eq!(estimate.likelihood, SolvabilityLikelihood::High);
        assert_eq!(estimate.total_points, 5);
        assert_eq!(estimate.parallel_velocity_pairs, 0);

        let parallel = parse_observations(
            "0, 0, 0 @ 1, 2, 3\n\
             10, 0, 0 @ 1, 2, 3\n\
             0, 10, 0 @ 1, 2, 3\n",
        )
        .unwrap();
        let problem = IntersectionProblem::with_points(Settings::default(), parallel);
        let estimate = problem.estimate_solvability();
        assert_eq!(estimate.likelihood, SolvabilityLikelihood::Low);
        assert_eq!(estimate.parallel_velocity_pairs, 3);
    }
}
