use std::cmp::Reverse;

use crate::branching::DecisionPolicy;
use crate::branching::SelectionContext;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::StorageKey;
use crate::depsat_assert_simple;
use crate::engine::sat::clause_allocators::ClauseReference;
use crate::engine::variables::PropositionalVariable;

/// A [`DecisionPolicy`] which gathers the unassigned variables of the clauses that are not
/// satisfied yet and suggests the most preferred of them.
///
/// Candidates are considered in the following order:
/// 1. the installed variables, in the order in which they were given (only when installed
///    variables are preferred);
/// 2. the required variables;
/// 3. the variables of the clauses which are not satisfied;
/// 4. any unassigned variable.
///
/// Within a group the variable with the highest preference wins (e.g. the version rank of the
/// package), ties are broken by the lowest id.
///
/// The set of unsatisfied clauses is maintained from the changelog of the assignment, and
/// clauses added to the solver after the policy was created (e.g. learned clauses) are indexed
/// the next time a decision is requested.
#[derive(Clone, Debug, Default)]
pub struct UndeterminedClausePolicy {
    prefer_installed: bool,
    installed: Vec<PropositionalVariable>,
    requirements: HashSet<PropositionalVariable>,
    preferences: HashMap<PropositionalVariable, u64>,

    unsatisfied_clauses: HashSet<ClauseReference>,
    clauses_of_variable: HashMap<PropositionalVariable, Vec<ClauseReference>>,
    decision_set: HashSet<PropositionalVariable>,
    num_indexed_clauses: usize,
}

impl UndeterminedClausePolicy {
    pub fn new(prefer_installed: bool) -> Self {
        UndeterminedClausePolicy {
            prefer_installed,
            ..Default::default()
        }
    }

    /// Sets the installed variables; when installed variables are preferred, they are decided on
    /// in the given order.
    pub fn with_installed(
        mut self,
        installed: impl IntoIterator<Item = PropositionalVariable>,
    ) -> Self {
        self.installed = installed.into_iter().collect();
        self
    }

    /// Sets the preference of variables; a higher preference is decided on earlier. Variables
    /// without a preference have preference zero.
    pub fn with_preferences(
        mut self,
        preferences: impl IntoIterator<Item = (PropositionalVariable, u64)>,
    ) -> Self {
        self.preferences = preferences.into_iter().collect();
        self
    }

    fn index_new_clauses(&mut self, context: &SelectionContext) {
        let clauses = context.clauses();
        for index in self.num_indexed_clauses..clauses.num_clauses() {
            let clause_reference = ClauseReference::create_from_index(index);
            let clause = &clauses[clause_reference];
            for literal in clause.iter() {
                self.clauses_of_variable
                    .entry(literal.get_propositional_variable())
                    .or_default()
                    .push(clause_reference);
            }
            let _ = self.unsatisfied_clauses.insert(clause_reference);
        }
        self.num_indexed_clauses = clauses.num_clauses();
    }

    fn update_cache_from_assignments(&mut self, context: &mut SelectionContext) {
        for change in context.consume_changelog() {
            let Some(clause_references) = self.clauses_of_variable.get(&change.variable) else {
                continue;
            };
            for &clause_reference in clause_references {
                let is_satisfied = context.clauses()[clause_reference]
                    .iter()
                    .any(|literal| context.value_of(literal) == Some(true));
                if is_satisfied {
                    let _ = self.unsatisfied_clauses.remove(&clause_reference);
                } else {
                    let _ = self.unsatisfied_clauses.insert(clause_reference);
                }
            }
        }
    }

    /// Recomputes the candidate pool from the clauses which are not satisfied.
    fn refresh_decision_set(&mut self, context: &mut SelectionContext) {
        self.update_cache_from_assignments(context);

        self.decision_set.clear();
        for &clause_reference in &self.unsatisfied_clauses {
            for literal in context.clauses()[clause_reference].iter() {
                let variable = literal.get_propositional_variable();
                if context.is_unassigned(variable) {
                    let _ = self.decision_set.insert(variable);
                }
            }
        }
    }

    fn best_candidate(
        &self,
        candidates: impl IntoIterator<Item = PropositionalVariable>,
        context: &SelectionContext,
    ) -> Option<PropositionalVariable> {
        candidates
            .into_iter()
            .filter(|&variable| context.is_unassigned(variable))
            .max_by_key(|&variable| {
                (
                    self.preferences.get(&variable).copied().unwrap_or(0),
                    Reverse(variable.id()),
                )
            })
    }
}

impl DecisionPolicy for UndeterminedClausePolicy {
    fn get_next_package_id(
        &mut self,
        context: &mut SelectionContext,
    ) -> Option<PropositionalVariable> {
        if context.clauses().num_clauses() > self.num_indexed_clauses {
            self.index_new_clauses(context);
            self.refresh_decision_set(context);
        }

        let mut candidate = None;
        if self.prefer_installed {
            candidate = self
                .installed
                .iter()
                .copied()
                .find(|&variable| context.is_unassigned(variable));
        }

        if candidate.is_none() {
            candidate = self.best_candidate(self.requirements.iter().copied(), context);
        }

        if candidate.is_none() {
            self.decision_set
                .retain(|&variable| context.is_unassigned(variable));
            candidate = self.best_candidate(self.decision_set.iter().copied(), context);
        }

        if candidate.is_none() {
            self.refresh_decision_set(context);
            candidate = self
                .best_candidate(self.decision_set.iter().copied(), context)
                .or_else(|| self.best_candidate(context.unassigned_variables(), context));
        }

        if let Some(variable) = candidate {
            depsat_assert_simple!(
                context.is_unassigned(variable),
                "Trying to decide on variable {variable} which is already assigned"
            );
        }

        candidate
    }

    fn add_requirements(&mut self, variables: &[PropositionalVariable]) {
        self.requirements.extend(variables.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sat::clause_allocators::Clause;
    use crate::engine::sat::clause_allocators::ClauseAllocator;
    use crate::engine::sat::AssignmentSet;
    use crate::engine::variables::Literal;

    fn var(id: u32) -> PropositionalVariable {
        PropositionalVariable::new(id)
    }

    fn setup(num_variables: u32, clauses: &[&[i32]]) -> (AssignmentSet, ClauseAllocator) {
        let mut assignments = AssignmentSet::default();
        for id in 1..=num_variables {
            assignments.set(var(id), None);
        }
        let mut clause_allocator = ClauseAllocator::default();
        for clause in clauses {
            let _ = clause_allocator.create_clause(Clause::new(
                clause
                    .iter()
                    .map(|&value| Literal::try_from(value).unwrap()),
                false,
            ));
        }
        (assignments, clause_allocator)
    }

    #[test]
    fn installed_variables_come_first_in_order() {
        let (mut assignments, clauses) = setup(4, &[&[1, 2], &[3, 4]]);
        let mut policy = UndeterminedClausePolicy::new(true).with_installed([var(4), var(2)]);

        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(4)));

        assignments.set(var(4), Some(true));
        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(2)));
    }

    #[test]
    fn installed_variables_are_ignored_when_not_preferred() {
        let (mut assignments, clauses) = setup(4, &[&[1, 2], &[3, 4]]);
        let mut policy = UndeterminedClausePolicy::new(false).with_installed([var(4)]);

        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(1)));
    }

    #[test]
    fn requirements_come_before_clause_variables() {
        let (mut assignments, clauses) = setup(3, &[&[1, 2]]);
        let mut policy = UndeterminedClausePolicy::new(true);
        policy.add_requirements(&[var(3)]);

        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(3)));
    }

    #[test]
    fn highest_preference_wins_within_a_group() {
        let (mut assignments, clauses) = setup(3, &[&[1, 2, 3]]);
        let mut policy = UndeterminedClausePolicy::new(true)
            .with_preferences([(var(1), 1), (var(2), 5), (var(3), 5)]);

        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(2)));
    }

    #[test]
    fn satisfied_clauses_do_not_contribute_candidates() {
        let (mut assignments, clauses) = setup(4, &[&[1, 2], &[3, 4]]);
        assignments.set(var(1), Some(true));
        let mut policy = UndeterminedClausePolicy::new(true);

        // Variable 2 is unassigned, but its only clause is satisfied
        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(3)));
    }

    #[test]
    fn candidate_pool_is_pruned_of_assigned_variables() {
        let (mut assignments, clauses) = setup(4, &[&[1, 2], &[3, 4]]);
        let mut policy = UndeterminedClausePolicy::new(true);

        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(1)));

        assignments.set(var(1), Some(false));
        assignments.set(var(2), Some(true));
        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(3)));
    }

    #[test]
    fn falls_back_to_any_unassigned_variable() {
        let (mut assignments, clauses) = setup(3, &[&[1]]);
        assignments.set(var(1), Some(true));
        let mut policy = UndeterminedClausePolicy::new(true);

        let mut context = SelectionContext::new(&mut assignments, &clauses);
        assert_eq!(policy.get_next_package_id(&mut context), Some(var(2)));
    }
}
