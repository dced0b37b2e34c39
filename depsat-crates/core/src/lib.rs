//! # depsat-core
//! A conflict-driven clause learning SAT engine geared towards resolving package dependencies.
//!
//! Problems are stated as clauses over [`variables::PropositionalVariable`]s, typically one
//! variable per package version, and solved by a [`SatisfactionSolver`]. The order in which the
//! solver tries packages is determined by a [`branching::DecisionPolicy`]. When no solution
//! exists, the [`results::UnsatisfiabilityWitness`] names the clauses which are in conflict.
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;

pub mod branching;
pub mod statistics;

pub use convert_case;

// We declare a private module with public use, so that all exports from API are exports directly
// from the crate.
//
// Example:
// `use depsat_core::results::SatisfactionResult;`
// vs.
// `use depsat_core::api::results::SatisfactionResult;`
mod api;

pub use api::*;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::engine::SatisfactionSolver;
pub use crate::engine::SatisfactionSolverOptions;
