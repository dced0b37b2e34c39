use std::fmt::Display;

use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::depsat_assert_simple;
use crate::engine::variables::Literal;
use crate::engine::variables::PropositionalVariable;

/// The state of a single variable in an [`AssignmentSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VariableState {
    /// The variable is not part of the problem.
    #[default]
    Missing,
    /// The variable is part of the problem but currently has no value.
    Unassigned,
    Assigned(bool),
}

impl VariableState {
    pub fn is_assigned(&self) -> bool {
        matches!(self, VariableState::Assigned(_))
    }

    pub fn value(&self) -> Option<bool> {
        match self {
            VariableState::Assigned(value) => Some(*value),
            VariableState::Missing | VariableState::Unassigned => None,
        }
    }
}

impl From<Option<bool>> for VariableState {
    fn from(value: Option<bool>) -> Self {
        value.map_or(VariableState::Unassigned, VariableState::Assigned)
    }
}

impl Display for VariableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableState::Missing => write!(f, "missing"),
            VariableState::Unassigned => write!(f, "unassigned"),
            VariableState::Assigned(value) => write!(f, "{value}"),
        }
    }
}

/// An entry of the changelog of an [`AssignmentSet`]: the state of `variable` when the changelog
/// was last consumed, and its state now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignmentChange {
    pub variable: PropositionalVariable,
    pub original: VariableState,
    pub new: VariableState,
}

/// The assignment of every variable of the problem, together with a log of the changes made
/// since it was last consumed.
///
/// Decision policies use the changelog to update their bookkeeping incrementally rather than
/// rescanning all variables on every decision.
#[derive(Clone, Debug, Default)]
pub struct AssignmentSet {
    states: KeyedVec<PropositionalVariable, VariableState>,
    num_assigned: usize,
    num_variables: usize,
    /// Maps a changed variable to the state it had when the changelog was last consumed
    changelog: HashMap<PropositionalVariable, VariableState>,
}

impl AssignmentSet {
    /// Sets the value of `variable`, registering it if it was not part of the problem yet.
    ///
    /// Overwriting a truth value with its negation is not allowed; the variable has to be
    /// unassigned first.
    pub fn set(&mut self, variable: PropositionalVariable, value: Option<bool>) {
        self.states.accommodate(variable, VariableState::Missing);

        let previous = self.states[variable];
        let new = VariableState::from(value);
        depsat_assert_simple!(
            !matches!(
                (previous, new),
                (VariableState::Assigned(a), VariableState::Assigned(b)) if a != b
            ),
            "Variable {variable} is reassigned from {previous} to {new} without being unassigned"
        );

        self.update_counts(previous, new);
        self.update_changelog(variable, previous, new);
        self.states[variable] = new;
    }

    /// Marks `variable` as no longer being part of the problem.
    pub fn remove(&mut self, variable: PropositionalVariable) {
        if !self.contains(variable) {
            return;
        }

        let previous = self.states[variable];
        self.update_counts(previous, VariableState::Missing);
        self.update_changelog(variable, previous, VariableState::Missing);
        self.states[variable] = VariableState::Missing;
    }

    fn update_counts(&mut self, previous: VariableState, new: VariableState) {
        if previous.is_assigned() {
            self.num_assigned -= 1;
        }
        if new.is_assigned() {
            self.num_assigned += 1;
        }

        match (previous, new) {
            (VariableState::Missing, VariableState::Missing) => {}
            (VariableState::Missing, _) => self.num_variables += 1,
            (_, VariableState::Missing) => self.num_variables -= 1,
            _ => {}
        }
    }

    fn update_changelog(
        &mut self,
        variable: PropositionalVariable,
        previous: VariableState,
        new: VariableState,
    ) {
        let original = self.changelog.get(&variable).copied().unwrap_or(previous);
        if original == new {
            let _ = self.changelog.remove(&variable);
        } else {
            let _ = self.changelog.insert(variable, original);
        }
    }

    pub fn get(&self, variable: PropositionalVariable) -> VariableState {
        self.states
            .get(variable)
            .copied()
            .unwrap_or(VariableState::Missing)
    }

    pub fn contains(&self, variable: PropositionalVariable) -> bool {
        self.get(variable) != VariableState::Missing
    }

    pub fn is_assigned(&self, variable: PropositionalVariable) -> bool {
        self.get(variable).is_assigned()
    }

    /// The truth value of `literal`, or [`None`] if its variable is unassigned or missing.
    pub fn value_of(&self, literal: Literal) -> Option<bool> {
        self.get(literal.get_propositional_variable())
            .value()
            .map(|value| value == literal.is_positive())
    }

    pub fn num_assigned(&self) -> usize {
        self.num_assigned
    }

    /// The number of variables which are part of the problem.
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// The largest variable id the set has ever stored, plus one.
    pub fn variable_capacity(&self) -> usize {
        self.states.len()
    }

    /// The variables which are part of the problem, in increasing order.
    pub fn variables(&self) -> impl Iterator<Item = PropositionalVariable> + '_ {
        self.states
            .keys()
            .filter(|&variable| self.states[variable] != VariableState::Missing)
    }

    pub fn assigned_variables(&self) -> impl Iterator<Item = PropositionalVariable> + '_ {
        self.states
            .keys()
            .filter(|&variable| self.states[variable].is_assigned())
    }

    pub fn unassigned_variables(&self) -> impl Iterator<Item = PropositionalVariable> + '_ {
        self.states
            .keys()
            .filter(|&variable| self.states[variable] == VariableState::Unassigned)
    }

    pub fn has_changes(&self) -> bool {
        !self.changelog.is_empty()
    }

    /// The changes made since the changelog was last consumed, ordered by variable.
    pub fn get_changelog(&self) -> Vec<AssignmentChange> {
        let mut changes = self
            .changelog
            .iter()
            .map(|(&variable, &original)| AssignmentChange {
                variable,
                original,
                new: self.get(variable),
            })
            .collect::<Vec<_>>();
        changes.sort_by_key(|change| change.variable.index());
        changes
    }

    /// Returns the changes made since the changelog was last consumed, ordered by variable, and
    /// starts a new changelog.
    pub fn consume_changelog(&mut self) -> Vec<AssignmentChange> {
        let changes = self.get_changelog();
        self.changelog.clear();
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(id: u32) -> PropositionalVariable {
        PropositionalVariable::new(id)
    }

    #[test]
    fn starts_empty() {
        let mut assignments = AssignmentSet::default();
        assert_eq!(assignments.num_assigned(), 0);
        assert_eq!(assignments.num_variables(), 0);
        assert!(assignments.consume_changelog().is_empty());
        assert_eq!(assignments.variables().count(), 0);
    }

    #[test]
    fn num_assigned_is_tracked() {
        let mut assignments = AssignmentSet::default();

        assignments.set(var(0), None);
        assert_eq!(assignments.num_assigned(), 0);

        assignments.set(var(1), Some(true));
        assert_eq!(assignments.num_assigned(), 1);

        assignments.set(var(0), Some(false));
        assert_eq!(assignments.num_assigned(), 2);

        assignments.set(var(1), None);
        assert_eq!(assignments.num_assigned(), 1);

        assignments.set(var(1), Some(true));
        assert_eq!(assignments.num_assigned(), 2);

        assignments.remove(var(0));
        assert_eq!(assignments.num_assigned(), 1);
        assert_eq!(assignments.num_variables(), 1);

        assignments.set(var(1), None);
        assert_eq!(assignments.num_assigned(), 0);

        assignments.remove(var(1));
        assert_eq!(assignments.num_assigned(), 0);
        assert_eq!(assignments.num_variables(), 0);
    }

    #[test]
    fn container_queries() {
        let mut assignments = AssignmentSet::default();

        assignments.set(var(0), Some(true));
        assignments.set(var(1), Some(false));
        assignments.set(var(3), None);

        assert!(assignments.contains(var(0)));
        assert!(!assignments.contains(var(2)));
        assert!(!assignments.contains(var(10)));
        assert_eq!(
            assignments.variables().collect::<Vec<_>>(),
            vec![var(0), var(1), var(3)]
        );
        assert_eq!(
            assignments.unassigned_variables().collect::<Vec<_>>(),
            vec![var(3)]
        );
        assert_eq!(
            assignments.assigned_variables().collect::<Vec<_>>(),
            vec![var(0), var(1)]
        );
    }

    #[test]
    fn value_of_respects_polarity() {
        let mut assignments = AssignmentSet::default();
        assignments.set(var(2), Some(false));

        assert_eq!(assignments.value_of(Literal::try_from(2).unwrap()), Some(false));
        assert_eq!(assignments.value_of(Literal::try_from(-2).unwrap()), Some(true));
        assert_eq!(assignments.value_of(Literal::try_from(3).unwrap()), None);
    }

    #[test]
    fn changelog_records_the_original_value() {
        let mut assignments = AssignmentSet::default();

        assignments.set(var(1), None);
        assignments.set(var(1), Some(true));
        assignments.set(var(2), Some(false));

        assert_eq!(
            assignments.consume_changelog(),
            vec![
                AssignmentChange {
                    variable: var(1),
                    original: VariableState::Missing,
                    new: VariableState::Assigned(true),
                },
                AssignmentChange {
                    variable: var(2),
                    original: VariableState::Missing,
                    new: VariableState::Assigned(false),
                },
            ]
        );
        assert!(assignments.consume_changelog().is_empty());
    }

    #[test]
    fn reverting_to_the_original_value_drops_the_entry() {
        let mut assignments = AssignmentSet::default();
        assignments.set(var(1), None);
        let _ = assignments.consume_changelog();

        assignments.set(var(1), Some(true));
        assignments.set(var(1), None);

        assert!(!assignments.has_changes());
        assert!(assignments.get_changelog().is_empty());
    }

    #[test]
    fn removal_is_logged() {
        let mut assignments = AssignmentSet::default();
        assignments.set(var(4), Some(true));
        let _ = assignments.consume_changelog();

        assignments.remove(var(4));

        assert_eq!(
            assignments.get_changelog(),
            vec![AssignmentChange {
                variable: var(4),
                original: VariableState::Assigned(true),
                new: VariableState::Missing,
            }]
        );
    }

    #[test]
    fn clone_keeps_changelog_and_counts() {
        let mut assignments = AssignmentSet::default();
        assignments.set(var(1), Some(true));
        assignments.set(var(2), None);

        let mut copy = assignments.clone();
        assert_eq!(copy.num_assigned(), 1);
        assert_eq!(copy.num_variables(), 2);

        copy.set(var(2), Some(false));
        assert_eq!(copy.consume_changelog().len(), 2);
        assert_eq!(assignments.get(var(2)), VariableState::Unassigned);
        assert_eq!(assignments.get_changelog().len(), 2);
    }

    #[test]
    #[should_panic]
    fn contradicting_reassignment_panics() {
        let mut assignments = AssignmentSet::default();
        assignments.set(var(1), Some(true));
        assignments.set(var(1), Some(false));
    }
}
