//! Contains the outputs of the [`SatisfactionSolver`].
pub mod unsatisfiable;

pub use crate::basic_types::Solution;
pub use unsatisfiable::UnsatisfiabilityWitness;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::SatisfactionSolver;

/// The result of a call to [`SatisfactionSolver::solve`].
#[derive(Debug)]
#[allow(
    clippy::large_enum_variant,
    reason = "the result is returned once per solve call"
)]
pub enum SatisfactionResult {
    /// Indicates that a solution was found and provides the corresponding [`Solution`].
    Satisfiable(Solution),
    /// Indicates that there is no solution; the [`UnsatisfiabilityWitness`] explains which
    /// clauses are in conflict.
    Unsatisfiable(UnsatisfiabilityWitness),
    /// Indicates that it is not known whether a solution exists. This is likely due to a
    /// [`TerminationCondition`] triggering.
    Unknown,
}

impl SatisfactionResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatisfactionResult::Satisfiable(_))
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, SatisfactionResult::Unsatisfiable(_))
    }
}
