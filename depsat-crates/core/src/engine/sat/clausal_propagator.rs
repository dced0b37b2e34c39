use super::clause_allocators::ClauseAllocator;
use super::clause_allocators::ClauseReference;
use super::PropositionalAssignments;
use crate::containers::KeyedVec;
use crate::depsat_assert_moderate;
use crate::depsat_assert_simple;
use crate::engine::variables::Literal;

#[derive(Clone, Copy, Debug)]
struct ClauseWatcher {
    /// The other watched literal at the time the watcher was last inspected; if it is true the
    /// clause is satisfied and need not be loaded
    cached_literal: Literal,
    clause_reference: ClauseReference,
}

/// Unit propagation over the clauses in the [`ClauseAllocator`] using two watched literals.
///
/// `watch_lists[l]` holds the clauses which watch `!l`, i.e. the clauses to inspect once `l`
/// becomes true. The literals which still need to be propagated are the suffix of the trail
/// starting at `next_position_on_trail_to_propagate`.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClausalPropagator {
    watch_lists: KeyedVec<Literal, Vec<ClauseWatcher>>,
    next_position_on_trail_to_propagate: usize,
}

impl ClausalPropagator {
    /// Makes sure both literals of `literal`'s variable have a watch list.
    pub(crate) fn grow(&mut self, literal: Literal) {
        let positive = if literal.is_positive() {
            literal
        } else {
            !literal
        };
        self.watch_lists.accommodate(positive, vec![]);
    }

    /// Adds an input clause to the propagator. The literals of the clause are reordered such that
    /// the non-false literals come first.
    ///
    /// Returns the clause if it is falsified under the current assignment. A clause which is unit
    /// under the current assignment enqueues its first literal.
    pub(crate) fn add_clause(
        &mut self,
        clause_reference: ClauseReference,
        assignments: &mut PropositionalAssignments,
        clause_allocator: &mut ClauseAllocator,
    ) -> Option<ClauseReference> {
        let clause = &mut clause_allocator[clause_reference];
        for literal in clause.iter().collect::<Vec<_>>() {
            self.grow(literal);
        }

        match clause.len() {
            0 => return Some(clause_reference),
            1 => {
                return if assignments.enqueue(clause[0], Some(clause_reference)) {
                    None
                } else {
                    Some(clause_reference)
                };
            }
            _ => {}
        }

        let mut num_non_false = 0;
        for position in 0..clause.len() {
            if !assignments.is_literal_assigned_false(clause[position]) {
                clause.swap(num_non_false, position);
                num_non_false += 1;
            }
        }

        if assignments.is_literal_assigned_false(clause[0]) {
            return Some(clause_reference);
        }

        if assignments.is_literal_assigned_false(clause[1])
            && assignments.is_literal_unassigned(clause[0])
        {
            let _ = assignments.enqueue(clause[0], Some(clause_reference));
        }

        self.start_watching(clause_reference, clause_allocator);
        None
    }

    /// Registers a learned clause with the propagator. The clause is expected to have its
    /// asserting literal at position zero and the literal with the highest decision level among
    /// the others at position one.
    pub(crate) fn add_learned_clause(
        &mut self,
        clause_reference: ClauseReference,
        clause_allocator: &ClauseAllocator,
    ) {
        if clause_allocator[clause_reference].len() >= 2 {
            self.start_watching(clause_reference, clause_allocator);
        }
    }

    fn start_watching(
        &mut self,
        clause_reference: ClauseReference,
        clause_allocator: &ClauseAllocator,
    ) {
        let clause = &clause_allocator[clause_reference];
        depsat_assert_simple!(clause.len() >= 2);

        self.watch_lists[!clause[0]].push(ClauseWatcher {
            cached_literal: clause[1],
            clause_reference,
        });
        self.watch_lists[!clause[1]].push(ClauseWatcher {
            cached_literal: clause[0],
            clause_reference,
        });
    }

    /// Propagates every literal on the trail which has not been propagated yet.
    ///
    /// Returns the conflicting clause if a clause becomes falsified, in which case the remaining
    /// literals on the trail are not propagated.
    pub(crate) fn propagate(
        &mut self,
        assignments: &mut PropositionalAssignments,
        clause_allocator: &mut ClauseAllocator,
    ) -> Option<ClauseReference> {
        while self.next_position_on_trail_to_propagate < assignments.num_trail_entries() {
            let true_literal =
                assignments.get_trail_entry(self.next_position_on_trail_to_propagate);
            self.next_position_on_trail_to_propagate += 1;

            if let Some(conflict) =
                self.propagate_literal(true_literal, assignments, clause_allocator)
            {
                self.next_position_on_trail_to_propagate = assignments.num_trail_entries();
                return Some(conflict);
            }
        }

        None
    }

    fn propagate_literal(
        &mut self,
        true_literal: Literal,
        assignments: &mut PropositionalAssignments,
        clause_allocator: &mut ClauseAllocator,
    ) -> Option<ClauseReference> {
        let false_literal = !true_literal;
        let mut watchers = std::mem::take(&mut self.watch_lists[true_literal]);

        let mut end_index = 0;
        let mut current_index = 0;
        while current_index < watchers.len() {
            let watcher = watchers[current_index];
            current_index += 1;

            if assignments.is_literal_assigned_true(watcher.cached_literal) {
                watchers[end_index] = watcher;
                end_index += 1;
                continue;
            }

            let clause = &mut clause_allocator[watcher.clause_reference];
            if clause[0] == false_literal {
                clause.swap(0, 1);
            }
            depsat_assert_moderate!(clause[1] == false_literal);

            if assignments.is_literal_assigned_true(clause[0]) {
                watchers[end_index] = ClauseWatcher {
                    cached_literal: clause[0],
                    clause_reference: watcher.clause_reference,
                };
                end_index += 1;
                continue;
            }

            let replacement = (2..clause.len())
                .find(|&position| !assignments.is_literal_assigned_false(clause[position]));
            if let Some(position) = replacement {
                clause.swap(1, position);
                self.watch_lists[!clause[1]].push(ClauseWatcher {
                    cached_literal: clause[0],
                    clause_reference: watcher.clause_reference,
                });
                continue;
            }

            watchers[end_index] = ClauseWatcher {
                cached_literal: clause[0],
                clause_reference: watcher.clause_reference,
            };
            end_index += 1;

            if assignments.is_literal_assigned_false(clause[0]) {
                while current_index < watchers.len() {
                    watchers[end_index] = watchers[current_index];
                    end_index += 1;
                    current_index += 1;
                }
                watchers.truncate(end_index);
                self.watch_lists[true_literal] = watchers;
                return Some(watcher.clause_reference);
            }

            let _ = assignments.enqueue(clause[0], Some(watcher.clause_reference));
        }

        watchers.truncate(end_index);
        self.watch_lists[true_literal] = watchers;
        None
    }

    /// Notifies the propagator that the trail has been shrunk to `trail_len` entries.
    pub(crate) fn synchronise(&mut self, trail_len: usize) {
        self.next_position_on_trail_to_propagate =
            self.next_position_on_trail_to_propagate.min(trail_len);
    }

    /// Checks that every clause of length at least two is watched exactly through its first two
    /// literals, and that a false watched literal only occurs next to a true one.
    pub(crate) fn debug_check_state(
        &self,
        assignments: &PropositionalAssignments,
        clause_allocator: &ClauseAllocator,
    ) -> bool {
        for clause_reference in clause_allocator.iter() {
            let clause = &clause_allocator[clause_reference];
            if clause.len() < 2 || !self.is_watched(clause_reference) {
                continue;
            }

            for (watched, other) in [(clause[0], clause[1]), (clause[1], clause[0])] {
                let count = self.watch_lists[!watched]
                    .iter()
                    .filter(|watcher| watcher.clause_reference == clause_reference)
                    .count();
                assert_eq!(
                    count, 1,
                    "Clause {clause} is watched {count} times through {watched}"
                );

                if assignments.is_literal_assigned_false(watched) {
                    assert!(
                        assignments.is_literal_assigned_true(other),
                        "Clause {clause} has false watched literal {watched} next to {other}"
                    );
                }
            }
        }

        true
    }

    fn is_watched(&self, clause_reference: ClauseReference) -> bool {
        self.watch_lists
            .iter()
            .flatten()
            .any(|watcher| watcher.clause_reference == clause_reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sat::clause_allocators::Clause;
    use crate::engine::variables::PropositionalVariable;

    fn lit(value: i32) -> Literal {
        Literal::try_from(value).unwrap()
    }

    struct TestSetup {
        propagator: ClausalPropagator,
        assignments: PropositionalAssignments,
        clause_allocator: ClauseAllocator,
    }

    impl TestSetup {
        fn new(num_variables: u32) -> TestSetup {
            let mut assignments = PropositionalAssignments::default();
            let mut propagator = ClausalPropagator::default();
            for id in 1..=num_variables {
                let variable = PropositionalVariable::new(id);
                assignments.register_variable(variable);
                propagator.grow(Literal::new(variable, true));
            }
            TestSetup {
                propagator,
                assignments,
                clause_allocator: ClauseAllocator::default(),
            }
        }

        fn add_clause(&mut self, literals: &[i32]) -> Option<ClauseReference> {
            let clause_reference = self
                .clause_allocator
                .create_clause(Clause::new(literals.iter().map(|&l| lit(l)), false));
            self.propagator.add_clause(
                clause_reference,
                &mut self.assignments,
                &mut self.clause_allocator,
            )
        }

        fn decide(&mut self, literal: i32) {
            self.assignments.increase_decision_level();
            assert!(self.assignments.enqueue(lit(literal), None));
        }

        fn propagate(&mut self) -> Option<ClauseReference> {
            let result = self
                .propagator
                .propagate(&mut self.assignments, &mut self.clause_allocator);
            if result.is_none() {
                assert!(self
                    .propagator
                    .debug_check_state(&self.assignments, &self.clause_allocator));
            }
            result
        }
    }

    #[test]
    fn unit_clause_is_enqueued_with_itself_as_reason() {
        let mut setup = TestSetup::new(1);
        let clause_reference = setup.add_clause(&[-1]);

        assert_eq!(clause_reference, None);
        assert!(setup.assignments.is_literal_assigned_true(lit(-1)));
        assert!(setup
            .assignments
            .get_variable_reason(PropositionalVariable::new(1))
            .is_some());
    }

    #[test]
    fn empty_clause_conflicts_immediately() {
        let mut setup = TestSetup::new(1);
        assert!(setup.add_clause(&[]).is_some());
    }

    #[test]
    fn chain_of_implications_is_propagated() {
        let mut setup = TestSetup::new(3);
        let _ = setup.add_clause(&[-1, 2]);
        let _ = setup.add_clause(&[-2, 3]);

        setup.decide(1);
        assert_eq!(setup.propagate(), None);

        assert!(setup.assignments.is_literal_assigned_true(lit(2)));
        assert!(setup.assignments.is_literal_assigned_true(lit(3)));
        assert_eq!(setup.assignments.num_trail_entries(), 3);
    }

    #[test]
    fn watch_moves_to_a_non_false_literal() {
        let mut setup = TestSetup::new(3);
        assert_eq!(setup.add_clause(&[1, 2, 3]), None);

        setup.decide(-1);
        assert_eq!(setup.propagate(), None);

        assert!(setup.assignments.is_literal_unassigned(lit(2)));
        assert!(setup.assignments.is_literal_unassigned(lit(3)));
    }

    #[test]
    fn falsified_clause_is_reported() {
        let mut setup = TestSetup::new(2);
        let _ = setup.add_clause(&[1, 2]);
        let conflicting = setup.add_clause(&[1, -2]);
        assert_eq!(conflicting, None);

        setup.decide(-1);
        let conflict = setup.propagate();

        assert!(conflict.is_some());
        let clause = &setup.clause_allocator[conflict.unwrap()];
        assert!(clause
            .iter()
            .all(|literal| setup.assignments.is_literal_assigned_false(literal)));
    }

    #[test]
    fn clause_false_at_addition_is_a_conflict() {
        let mut setup = TestSetup::new(2);
        let _ = setup.add_clause(&[-1]);
        let _ = setup.add_clause(&[-2]);

        assert!(setup.add_clause(&[1, 2]).is_some());
    }

    #[test]
    fn clause_unit_at_addition_enqueues_its_literal() {
        let mut setup = TestSetup::new(3);
        let _ = setup.add_clause(&[-1]);
        let _ = setup.add_clause(&[-2]);

        assert_eq!(setup.add_clause(&[1, 2, 3]), None);
        assert!(setup.assignments.is_literal_assigned_true(lit(3)));
    }

    #[test]
    fn synchronise_allows_repropagation_after_backtracking() {
        let mut setup = TestSetup::new(2);
        let _ = setup.add_clause(&[-1, 2]);

        setup.decide(1);
        assert_eq!(setup.propagate(), None);
        assert!(setup.assignments.is_literal_assigned_true(lit(2)));

        setup.assignments.cancel_until(0);
        setup
            .propagator
            .synchronise(setup.assignments.num_trail_entries());
        assert!(setup.assignments.is_literal_unassigned(lit(2)));

        setup.decide(1);
        assert_eq!(setup.propagate(), None);
        assert!(setup.assignments.is_literal_assigned_true(lit(2)));
    }
}
