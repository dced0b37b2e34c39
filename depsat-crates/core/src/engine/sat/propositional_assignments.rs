use super::clause_allocators::ClauseReference;
use super::AssignmentSet;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::depsat_assert_moderate;
use crate::depsat_assert_simple;
use crate::engine::variables::Literal;
use crate::engine::variables::PropositionalVariable;

#[derive(Clone, Copy, Debug, Default)]
struct AssignmentInfo {
    decision_level: usize,
    /// [`None`] for decisions and for unassigned variables
    reason: Option<ClauseReference>,
}

/// The assignment of the solver together with the trail of literals in the order in which they
/// became true, the decision level of every assignment, and the clause which forced it.
#[derive(Clone, Debug, Default)]
pub(crate) struct PropositionalAssignments {
    assignment_set: AssignmentSet,
    info: KeyedVec<PropositionalVariable, AssignmentInfo>,
    trail: Trail<Literal>,
}

impl PropositionalAssignments {
    pub(crate) fn register_variable(&mut self, variable: PropositionalVariable) {
        if !self.assignment_set.contains(variable) {
            self.assignment_set.set(variable, None);
        }
        self.info.accommodate(variable, AssignmentInfo::default());
    }

    pub(crate) fn is_registered(&self, variable: PropositionalVariable) -> bool {
        self.assignment_set.contains(variable)
    }

    /// Makes `literal` true with the given reason.
    ///
    /// If the variable already has a value, nothing changes and the return value states whether
    /// that value agrees with `literal`. Otherwise the literal is pushed on the trail and true is
    /// returned.
    pub(crate) fn enqueue(&mut self, literal: Literal, reason: Option<ClauseReference>) -> bool {
        let variable = literal.get_propositional_variable();
        if let Some(value) = self.assignment_set.value_of(literal) {
            return value;
        }

        self.register_variable(variable);
        self.assignment_set.set(variable, Some(literal.is_positive()));
        self.info[variable] = AssignmentInfo {
            decision_level: self.get_decision_level(),
            reason,
        };
        self.trail.push(literal);
        true
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.trail.increase_decision_level();
    }

    /// Pops the last literal of the trail and unassigns its variable.
    pub(crate) fn undo_one(&mut self) {
        let Some(literal) = self.trail.pop() else {
            panic!("Attempted to undo an assignment on an empty trail");
        };
        let variable = literal.get_propositional_variable();
        self.assignment_set.set(variable, None);
        self.info[variable] = AssignmentInfo::default();
    }

    /// Undoes every assignment of the current decision level and leaves that level.
    pub(crate) fn cancel(&mut self) {
        let level_start = self.trail.pop_decision_level();
        while self.trail.len() > level_start {
            self.undo_one();
        }
    }

    pub(crate) fn cancel_until(&mut self, decision_level: usize) {
        depsat_assert_simple!(decision_level <= self.get_decision_level());
        while self.get_decision_level() > decision_level {
            self.cancel();
        }
        depsat_assert_moderate!(self
            .trail
            .iter()
            .all(|literal| self.get_variable_assignment_level(literal.get_propositional_variable())
                <= decision_level));
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.trail.get_decision_level()
    }

    pub(crate) fn is_at_the_root_level(&self) -> bool {
        self.get_decision_level() == 0
    }

    pub(crate) fn get_variable_assignment_level(&self, variable: PropositionalVariable) -> usize {
        self.info[variable].decision_level
    }

    pub(crate) fn get_variable_reason(
        &self,
        variable: PropositionalVariable,
    ) -> Option<ClauseReference> {
        self.info[variable].reason
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn get_trail_entry(&self, index: usize) -> Literal {
        self.trail[index]
    }

    pub(crate) fn is_literal_assigned_true(&self, literal: Literal) -> bool {
        self.assignment_set.value_of(literal) == Some(true)
    }

    pub(crate) fn is_literal_assigned_false(&self, literal: Literal) -> bool {
        self.assignment_set.value_of(literal) == Some(false)
    }

    pub(crate) fn is_literal_unassigned(&self, literal: Literal) -> bool {
        self.assignment_set.value_of(literal).is_none()
    }

    pub(crate) fn is_variable_assigned(&self, variable: PropositionalVariable) -> bool {
        self.assignment_set.is_assigned(variable)
    }

    pub(crate) fn num_assigned(&self) -> usize {
        self.assignment_set.num_assigned()
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.assignment_set.num_variables()
    }

    pub(crate) fn assignment_set(&self) -> &AssignmentSet {
        &self.assignment_set
    }

    pub(crate) fn assignment_set_mut(&mut self) -> &mut AssignmentSet {
        &mut self.assignment_set
    }
}
