use thiserror::Error;

#[cfg(doc)]
use crate::SatisfactionSolver;

/// Errors related to adding clauses to the [`SatisfactionSolver`].
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// Error which indicate that adding a clause led to infeasibility at the root.
    #[error("Adding the clause failed because it is infeasible at the root")]
    InfeasibleClause,
    /// Error which indicates that a clause was attempted to be added while the
    /// [`SatisfactionSolver`] was in an infeasible state.
    #[error("Adding the clause failed because the solver is in an infeasible state")]
    InfeasibleState,
}
