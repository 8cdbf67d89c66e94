//! Linear system construction and solving backends

pub mod equations;
pub mod solver;

pub use equations::{pair_equations, triple_system};
pub use solver::{LinearSolution, UnifiedLinearSolver};
