pub(crate) mod conflict_analysis;
pub(crate) mod sat;
mod satisfaction_solver;
mod solver_statistics;
pub(crate) mod termination;
pub(crate) mod variables;

pub use satisfaction_solver::SatisfactionSolver;
pub use satisfaction_solver::SatisfactionSolverOptions;
