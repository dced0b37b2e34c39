//! Contains the conflict analysis of the solver: resolution over the trail up to the first
//! unique implication point.

mod learned_clause;
mod resolution_conflict_analyser;

pub(crate) use learned_clause::LearnedClause;
pub(crate) use resolution_conflict_analyser::ResolutionConflictAnalyser;
