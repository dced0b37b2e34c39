use super::LearnedClause;
use crate::containers::HashSet;
use crate::depsat_assert_moderate;
use crate::depsat_assert_simple;
use crate::engine::sat::clause_allocators::ClauseAllocator;
use crate::engine::sat::clause_allocators::ClauseReference;
use crate::engine::sat::PropositionalAssignments;
use crate::engine::variables::Literal;
use crate::engine::variables::PropositionalVariable;

/// Resolve conflicts according to the CDCL procedure.
///
/// Starting from the conflicting clause, the literals of the current decision level are resolved
/// away in reverse trail order until a single one remains: the first unique implication point.
/// The learned clause consists of the negation of that literal and the literals of earlier
/// levels encountered along the way.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResolutionConflictAnalyser {
    /// Variables which have been encountered during the current analysis
    seen: HashSet<PropositionalVariable>,
}

impl ResolutionConflictAnalyser {
    /// Computes the first-UIP clause for `conflict`, every literal of which has to be false.
    ///
    /// The trail is not modified; backtracking to the returned level removes the literals the
    /// analysis walked over.
    pub(crate) fn compute_1uip(
        &mut self,
        conflict: ClauseReference,
        assignments: &PropositionalAssignments,
        clause_allocator: &ClauseAllocator,
    ) -> LearnedClause {
        depsat_assert_moderate!(clause_allocator[conflict]
            .iter()
            .all(|literal| assignments.is_literal_assigned_false(literal)));
        self.seen.clear();

        let current_level = assignments.get_decision_level();
        let mut counter = 0_usize;
        let mut literals = vec![];
        let mut backjump_level = 0;
        let mut antecedents = vec![conflict];

        let mut reason_clause = conflict;
        let mut next_literal: Option<Literal> = None;
        let mut trail_index = assignments.num_trail_entries();

        loop {
            for true_literal in clause_allocator[reason_clause].calculate_reason(next_literal) {
                let variable = true_literal.get_propositional_variable();
                if !self.seen.insert(variable) {
                    continue;
                }

                let level = assignments.get_variable_assignment_level(variable);
                if level == current_level {
                    counter += 1;
                } else {
                    literals.push(!true_literal);
                    backjump_level = backjump_level.max(level);
                }
            }
            depsat_assert_simple!(
                counter > 0,
                "The conflict has no literal on the current decision level"
            );

            let uip_candidate = loop {
                depsat_assert_simple!(trail_index > 0);
                trail_index -= 1;
                let literal = assignments.get_trail_entry(trail_index);
                if self.seen.contains(&literal.get_propositional_variable()) {
                    break literal;
                }
            };
            next_literal = Some(uip_candidate);

            counter -= 1;
            if counter == 0 {
                break;
            }

            let Some(reason) =
                assignments.get_variable_reason(uip_candidate.get_propositional_variable())
            else {
                panic!("Literal {uip_candidate} is resolved during conflict analysis but has no reason");
            };
            reason_clause = reason;
            antecedents.push(reason_clause);
        }

        if let Some(uip) = next_literal {
            literals.push(!uip);
        }

        LearnedClause {
            literals,
            backjump_level,
            antecedents,
        }
    }
}
