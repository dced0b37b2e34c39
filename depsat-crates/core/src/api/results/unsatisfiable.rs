use std::collections::BTreeSet;
use std::fmt::Display;

use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::sat::clause_allocators::Clause;
use crate::engine::sat::clause_allocators::ClauseAllocator;
use crate::engine::sat::clause_allocators::ClauseReference;
use crate::engine::variables::Literal;

/// An explanation of why a problem has no solution.
///
/// The witness owns a snapshot of the clauses of the solver and of the reasons of the
/// assignments at the root level, taken when the root conflict was found. It can therefore
/// outlive the solver, and it is identical for identical inputs.
#[derive(Clone, Debug)]
pub struct UnsatisfiabilityWitness {
    clause_allocator: ClauseAllocator,
    /// For every literal which was true at the root, the clause which propagated it
    implications: KeyedVec<Literal, Option<ClauseReference>>,
    conflicting_clause: ClauseReference,
    learned_clause: Option<ClauseReference>,
}

impl UnsatisfiabilityWitness {
    pub(crate) fn new(
        mut clause_allocator: ClauseAllocator,
        root_implications: impl IntoIterator<Item = (Literal, Option<ClauseReference>)>,
        conflicting_clause: ClauseReference,
        learned_clause: Option<Clause>,
    ) -> Self {
        let mut implications = KeyedVec::default();
        for (literal, reason) in root_implications {
            implications.accommodate(literal, None);
            implications[literal] = reason;
        }

        let learned_clause = learned_clause.map(|clause| clause_allocator.create_clause(clause));

        UnsatisfiabilityWitness {
            clause_allocator,
            implications,
            conflicting_clause,
            learned_clause,
        }
    }

    /// The clause which was falsified at the root level.
    pub fn conflicting_clause(&self) -> &Clause {
        &self.clause_allocator[self.conflicting_clause]
    }

    /// The clause learned by analysing the root conflict, or [`None`] if the conflict was an
    /// empty clause.
    pub fn learned_clause(&self) -> Option<&Clause> {
        self.learned_clause
            .map(|clause_reference| &self.clause_allocator[clause_reference])
    }

    pub fn get_clause(&self, clause_reference: ClauseReference) -> &Clause {
        &self.clause_allocator[clause_reference]
    }

    /// The input clauses which together justify `clause_reference`, sorted and without
    /// duplicates.
    ///
    /// A learned clause is replaced by the clauses it was derived from. For every literal of a
    /// required clause which is false at the root, the clause that propagated its negation is
    /// required as well.
    pub fn clause_requirements(&self, clause_reference: ClauseReference) -> Vec<ClauseReference> {
        let mut requirements = BTreeSet::new();
        let mut visited: HashSet<ClauseReference> = HashSet::default();
        let mut to_visit = vec![clause_reference];

        while let Some(current) = to_visit.pop() {
            if !visited.insert(current) {
                continue;
            }

            let clause = &self.clause_allocator[current];
            if clause.is_learned() {
                to_visit.extend(clause.antecedents().iter().copied());
            } else {
                let _ = requirements.insert(current);
            }

            for literal in clause.iter() {
                if let Some(&Some(reason)) = self.implications.get(!literal) {
                    to_visit.push(reason);
                }
            }
        }

        requirements.into_iter().collect()
    }

    /// The input clauses which together justify the conflicting clause.
    pub fn conflict_requirements(&self) -> Vec<ClauseReference> {
        self.clause_requirements(self.conflicting_clause)
    }

    fn describe(&self, clause_reference: ClauseReference) -> String {
        let clause = &self.clause_allocator[clause_reference];
        match clause.provenance() {
            Some(provenance) => provenance.to_string(),
            None => clause.to_string(),
        }
    }
}

impl Display for UnsatisfiabilityWitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Conflicting requirements:")?;
        for requirement in self.conflict_requirements() {
            write!(f, "\n{}", self.describe(requirement))?;
        }
        Ok(())
    }
}
