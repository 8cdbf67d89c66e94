//! Linear system backends
//!
//! Two interchangeable backends solve the assembled 6x6 system: nalgebra's LU
//! decomposition and a hand-rolled partial-pivot Gaussian elimination. Both
//! treat a (near-)singular matrix as "no unique solution" and return `None`,
//! which the caller surfaces as a degenerate point configuration.

use crate::config::SolverBackend;
use nalgebra::{Matrix6, Vector6};

/// A solved assignment for the six unknowns, with the float residual of the
/// system it came from
#[derive(Debug, Clone, Copy)]
pub struct LinearSolution {
    pub values: Vector6<f64>,
    pub residual: f64,
}

/// Unified linear solver interface over the available backends
pub enum UnifiedLinearSolver {
    Lu(LuSolver),
    Elimination(EliminationSolver),
}

impl UnifiedLinearSolver {
    /// Create a solver instance for the configured backend
    pub fn new(backend: SolverBackend, pivot_epsilon: f64) -> Self {
        match backend {
            SolverBackend::Lu => UnifiedLinearSolver::Lu(LuSolver { pivot_epsilon }),
            SolverBackend::Elimination => {
                UnifiedLinearSolver::Elimination(EliminationSolver { pivot_epsilon })
            }
        }
    }

    /// Solve `matrix * x = rhs`, returning `None` when the system has no
    /// unique solution
    pub fn solve(&self, matrix: &Matrix6<f64>, rhs: &Vector6<f64>) -> Option<LinearSolution> {
        let values = match self {
            UnifiedLinearSolver::Lu(solver) => solver.solve(matrix, rhs)?,
            UnifiedLinearSolver::Elimination(solver) => solver.solve(matrix, rhs)?,
        };

        let residual = (matrix * values - rhs).amax();
        Some(LinearSolution { values, residual })
    }

    /// The backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedLinearSolver::Lu(_) => SolverBackend::Lu,
            UnifiedLinearSolver::Elimination(_) => SolverBackend::Elimination,
        }
    }
}

/// Backend built on nalgebra's LU decomposition
pub struct LuSolver {
    pivot_epsilon: f64,
}

impl LuSolver {
    fn solve(&self, matrix: &Matrix6<f64>, rhs: &Vector6<f64>) -> Option<Vector6<f64>> {
        // Reject near-singular systems explicitly; nalgebra only bails on an
        // exactly zero pivot, and float rounding of degenerate integer input
        // can leave a tiny nonzero determinant.
        let scale = matrix.amax().max(1.0);
        let lu = matrix.lu();
        if lu.determinant().abs() <= self.pivot_epsilon * scale.powi(5) {
            return None;
        }
        lu.solve(rhs)
    }
}

/// Stdlib-arithmetic Gaussian elimination with partial pivoting
pub struct EliminationSolver {
    pivot_epsilon: f64,
}

impl EliminationSolver {
    fn solve(&self, matrix: &Matrix6<f64>, rhs: &Vector6<f64>) -> Option<Vector6<f64>> {
        const N: usize = 6;
        let scale = matrix.amax().max(1.0);

        // Augmented matrix [A | b]
        let mut aug = [[0.0f64; N + 1]; N];
        for row in 0..N {
            for col in 0..N {
                aug[row][col] = matrix[(row, col)];
            }
            aug[row][N] = rhs[row];
        }

        // Forward elimination
        for col in 0..N {
            let pivot_row = (col..N)
                .max_by(|&a, &b| aug[a][col].abs().total_cmp(&aug[b][col].abs()))?;
            if aug[pivot_row][col].abs() <= self.pivot_epsilon * scale {
                return None;
            }
            aug.swap(col, pivot_row);

            for row in (col + 1)..N {
                let factor = aug[row][col] / aug[col][col];
                for k in col..=N {
                    aug[row][k] -= factor * aug[col][k];
                }
            }
        }

        // Back substitution
        let mut x = Vector6::zeros();
        for row in (0..N).rev() {
            let mut acc = aug[row][N];
            for col in (row + 1)..N {
                acc -= aug[row][col] * x[col];
            }
            x[row] = acc / aug[row][row];
        }

        Some(x)
    }
}
