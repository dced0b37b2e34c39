use std::cmp::Reverse;

use crate::branching::DecisionPolicy;
use crate::branching::SelectionContext;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyValueHeap;
use crate::containers::StorageKey;
use crate::depsat_assert_eq_simple;
use crate::engine::sat::VariableState;
use crate::engine::variables::PropositionalVariable;

const INSTALLED_GROUP: u8 = 0;
const REQUIRED_GROUP: u8 = 1;
const DEFAULT_GROUP: u8 = 2;

/// Lower tuples are decided on first: by group, then by rank, then by id.
type Priority = Reverse<(u8, u32, u32)>;

/// A [`DecisionPolicy`] which keeps the unassigned variables in a priority queue and suggests the
/// one with the highest priority.
///
/// Variables are split into three groups which are considered in order:
/// 1. installed variables (only when installed variables are preferred, otherwise they belong to
///    the default group);
/// 2. required variables;
/// 3. everything else.
///
/// Within a group, variables are ordered by their rank (lowest first) and then by their id.
/// Variables without a rank come after the ranked ones.
#[derive(Clone, Debug)]
pub struct PriorityQueuePolicy {
    prefer_installed: bool,
    installed: HashSet<PropositionalVariable>,
    required: HashSet<PropositionalVariable>,
    ranks: HashMap<PropositionalVariable, u32>,
    /// Contains every variable; exactly the unassigned ones are present
    unassigned: KeyValueHeap<PropositionalVariable, Priority>,
    needs_rebuild: bool,
}

impl PriorityQueuePolicy {
    pub fn new(prefer_installed: bool) -> Self {
        PriorityQueuePolicy {
            prefer_installed,
            installed: HashSet::default(),
            required: HashSet::default(),
            ranks: HashMap::default(),
            unassigned: KeyValueHeap::default(),
            needs_rebuild: true,
        }
    }

    pub fn with_installed(
        mut self,
        installed: impl IntoIterator<Item = PropositionalVariable>,
    ) -> Self {
        self.installed = installed.into_iter().collect();
        self.needs_rebuild = true;
        self
    }

    /// Sets the rank of variables, e.g. the position of a package in a topological order of the
    /// dependency graph. Within a group, lower ranks are decided on first.
    pub fn with_ranks(
        mut self,
        ranks: impl IntoIterator<Item = (PropositionalVariable, u32)>,
    ) -> Self {
        self.ranks = ranks.into_iter().collect();
        self.needs_rebuild = true;
        self
    }

    fn group(&self, variable: PropositionalVariable) -> u8 {
        if self.prefer_installed && self.installed.contains(&variable) {
            INSTALLED_GROUP
        } else if self.required.contains(&variable) {
            REQUIRED_GROUP
        } else {
            DEFAULT_GROUP
        }
    }

    fn priority(&self, variable: PropositionalVariable) -> Priority {
        let rank = self.ranks.get(&variable).copied().unwrap_or(u32::MAX);
        Reverse((self.group(variable), rank, variable.id()))
    }

    fn rebuild(&mut self, context: &SelectionContext) {
        self.unassigned.clear();
        for index in 0..context.assignments().variable_capacity() {
            let variable = PropositionalVariable::create_from_index(index);
            let priority = self.priority(variable);
            self.unassigned.grow(variable, priority);
            if !context.is_unassigned(variable) {
                self.unassigned.delete_key(variable);
            }
        }
        self.needs_rebuild = false;
    }

    fn update_cache_from_assignments(&mut self, context: &mut SelectionContext) {
        let changelog = context.consume_changelog();

        let has_new_variables = changelog.iter().any(|change| {
            change.original == VariableState::Missing || change.new == VariableState::Missing
        });
        if self.needs_rebuild
            || has_new_variables
            || self.unassigned.len() != context.assignments().variable_capacity()
        {
            self.rebuild(context);
        } else {
            for change in changelog {
                if change.new == VariableState::Unassigned {
                    self.unassigned.restore_key(change.variable);
                } else {
                    self.unassigned.delete_key(change.variable);
                }
            }
        }

        depsat_assert_eq_simple!(
            self.unassigned.num_nonremoved_elements(),
            context.num_variables() - context.num_assigned(),
            "The priority queue failed to track the unassigned variables"
        );
    }
}

impl DecisionPolicy for PriorityQueuePolicy {
    fn get_next_package_id(
        &mut self,
        context: &mut SelectionContext,
    ) -> Option<PropositionalVariable> {
        self.update_cache_from_assignments(context);
        self.unassigned.peek_max().map(|(&variable, _)| variable)
    }

    fn add_requirements(&mut self, variables: &[PropositionalVariable]) {
        self.required.extend(variables.iter().copied());
        self.needs_rebuild = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sat::clause_allocators::ClauseAllocator;
    use crate::engine::sat::AssignmentSet;

    fn var(id: u32) -> PropositionalVariable {
        PropositionalVariable::new(id)
    }

    fn unassigned(num_variables: u32) -> AssignmentSet {
        let mut assignments = AssignmentSet::default();
        for id in 1..=num_variables {
            assignments.set(var(id), None);
        }
        assignments
    }

    fn next(
        policy: &mut PriorityQueuePolicy,
        assignments: &mut AssignmentSet,
    ) -> Option<PropositionalVariable> {
        let clauses = ClauseAllocator::default();
        let mut context = SelectionContext::new(assignments, &clauses);
        policy.get_next_package_id(&mut context)
    }

    #[test]
    fn groups_are_considered_in_order() {
        let mut assignments = unassigned(5);
        let mut policy = PriorityQueuePolicy::new(true).with_installed([var(5)]);
        policy.add_requirements(&[var(4)]);

        assert_eq!(next(&mut policy, &mut assignments), Some(var(5)));
        assignments.set(var(5), Some(true));
        assert_eq!(next(&mut policy, &mut assignments), Some(var(4)));
        assignments.set(var(4), Some(true));
        assert_eq!(next(&mut policy, &mut assignments), Some(var(1)));
    }

    #[test]
    fn installed_fall_into_default_group_when_not_preferred() {
        let mut assignments = unassigned(3);
        let mut policy = PriorityQueuePolicy::new(false).with_installed([var(3)]);
        policy.add_requirements(&[var(2)]);

        assert_eq!(next(&mut policy, &mut assignments), Some(var(2)));
        assignments.set(var(2), Some(true));
        assert_eq!(next(&mut policy, &mut assignments), Some(var(1)));
    }

    #[test]
    fn rank_orders_within_a_group() {
        let mut assignments = unassigned(3);
        let mut policy = PriorityQueuePolicy::new(true).with_ranks([(var(3), 0), (var(2), 1)]);

        assert_eq!(next(&mut policy, &mut assignments), Some(var(3)));
        assignments.set(var(3), Some(false));
        assert_eq!(next(&mut policy, &mut assignments), Some(var(2)));
        assignments.set(var(2), Some(false));
        assert_eq!(next(&mut policy, &mut assignments), Some(var(1)));
    }

    #[test]
    fn unassigned_variables_return_to_the_queue() {
        let mut assignments = unassigned(2);
        let mut policy = PriorityQueuePolicy::new(true);

        assert_eq!(next(&mut policy, &mut assignments), Some(var(1)));
        assignments.set(var(1), Some(true));
        assert_eq!(next(&mut policy, &mut assignments), Some(var(2)));

        assignments.set(var(1), None);
        assert_eq!(next(&mut policy, &mut assignments), Some(var(1)));

        assignments.set(var(1), Some(true));
        assignments.set(var(2), Some(true));
        assert_eq!(next(&mut policy, &mut assignments), None);
    }
}
