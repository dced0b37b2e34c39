//! Contains the decision policies which determine the search order of the solver.
//!
//! A [`DecisionPolicy`] is asked for the next variable to decide on whenever propagation has
//! reached a fixed point without conflict; the solver then assigns the variable to the polarity
//! given by [`DecisionPolicy::select_polarity`]. The policies provided here are
//! - [`DefaultPolicy`], which picks the unassigned variable with the lowest id;
//! - [`UndeterminedClausePolicy`], which picks from the variables of clauses which are not yet
//!   satisfied;
//! - [`PriorityQueuePolicy`], which keeps the unassigned variables in a heap ordered by group and
//!   rank.
//!
//! Any policy can be wrapped in a [`PolicyLogger`] to record the decisions it made.
mod decision_policy;
pub mod policies;
mod policy_logger;
mod selection_context;

pub use decision_policy::DecisionPolicy;
pub use policies::DefaultPolicy;
pub use policies::PriorityQueuePolicy;
pub use policies::UndeterminedClausePolicy;
pub use policy_logger::PolicyLogger;
pub use selection_context::SelectionContext;
