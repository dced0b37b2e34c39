mod assignment_set;
mod clausal_propagator;
pub(crate) mod clause_allocators;
mod propositional_assignments;

pub use assignment_set::AssignmentChange;
pub use assignment_set::AssignmentSet;
pub use assignment_set::VariableState;
pub(crate) use clausal_propagator::ClausalPropagator;
pub(crate) use propositional_assignments::PropositionalAssignments;
