use crate::engine::sat::clause_allocators::ClauseAllocator;
use crate::engine::sat::AssignmentChange;
use crate::engine::sat::AssignmentSet;
use crate::engine::sat::VariableState;
use crate::engine::variables::Literal;
use crate::engine::variables::PropositionalVariable;
#[cfg(doc)]
use crate::branching::DecisionPolicy;

/// The context provided to a [`DecisionPolicy`]; it gives read access to the assignment and the
/// clauses of the solver.
///
/// The only mutation a policy can perform is consuming the changelog of the assignment.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a mut AssignmentSet,
    clause_allocator: &'a ClauseAllocator,
}

impl<'a> SelectionContext<'a> {
    pub fn new(
        assignments: &'a mut AssignmentSet,
        clause_allocator: &'a ClauseAllocator,
    ) -> Self {
        SelectionContext {
            assignments,
            clause_allocator,
        }
    }

    pub fn assignments(&self) -> &AssignmentSet {
        self.assignments
    }

    pub fn clauses(&self) -> &ClauseAllocator {
        self.clause_allocator
    }

    pub fn get_state(&self, variable: PropositionalVariable) -> VariableState {
        self.assignments.get(variable)
    }

    pub fn is_unassigned(&self, variable: PropositionalVariable) -> bool {
        self.assignments.get(variable) == VariableState::Unassigned
    }

    pub fn value_of(&self, literal: Literal) -> Option<bool> {
        self.assignments.value_of(literal)
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    pub fn num_assigned(&self) -> usize {
        self.assignments.num_assigned()
    }

    pub fn unassigned_variables(&self) -> impl Iterator<Item = PropositionalVariable> + '_ {
        self.assignments.unassigned_variables()
    }

    /// The changes to the assignment since the changelog was last consumed, without consuming
    /// them.
    pub fn get_changelog(&self) -> Vec<AssignmentChange> {
        self.assignments.get_changelog()
    }

    /// Returns the changes to the assignment since the changelog was last consumed, ordered by
    /// variable, and starts a new changelog.
    pub fn consume_changelog(&mut self) -> Vec<AssignmentChange> {
        self.assignments.consume_changelog()
    }
}
