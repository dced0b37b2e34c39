use std::fmt::Display;
use std::ops::Index;
use std::ops::IndexMut;

use super::Clause;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// A stable handle to a clause stored in a [`ClauseAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClauseReference {
    id: u32,
}

impl StorageKey for ClauseReference {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        ClauseReference { id: index as u32 }
    }
}

impl Display for ClauseReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.id)
    }
}

/// The arena in which all clauses live, both input and learned.
///
/// Clauses are never removed, so a [`ClauseReference`] stays valid for the lifetime of the
/// allocator.
#[derive(Clone, Debug, Default)]
pub struct ClauseAllocator {
    clauses: KeyedVec<ClauseReference, Clause>,
    num_learned_clauses: usize,
}

impl ClauseAllocator {
    pub fn create_clause(&mut self, clause: Clause) -> ClauseReference {
        if clause.is_learned() {
            self.num_learned_clauses += 1;
        }
        self.clauses.push(clause)
    }

    pub fn get_clause(&self, clause_reference: ClauseReference) -> &Clause {
        &self.clauses[clause_reference]
    }

    pub fn get_mutable_clause(&mut self, clause_reference: ClauseReference) -> &mut Clause {
        &mut self.clauses[clause_reference]
    }

    /// Iterates over the references in the order in which the clauses were allocated.
    pub fn iter(&self) -> impl Iterator<Item = ClauseReference> {
        self.clauses.keys()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn num_learned_clauses(&self) -> usize {
        self.num_learned_clauses
    }
}

impl Index<ClauseReference> for ClauseAllocator {
    type Output = Clause;

    fn index(&self, clause_reference: ClauseReference) -> &Self::Output {
        self.get_clause(clause_reference)
    }
}

impl IndexMut<ClauseReference> for ClauseAllocator {
    fn index_mut(&mut self, clause_reference: ClauseReference) -> &mut Self::Output {
        self.get_mutable_clause(clause_reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::variables::Literal;

    #[test]
    fn references_follow_allocation_order() {
        let mut allocator = ClauseAllocator::default();
        let literal = Literal::try_from(1).unwrap();

        let first = allocator.create_clause(Clause::new([literal], false));
        let second = allocator.create_clause(Clause::new([!literal], true));

        assert!(first < second);
        assert_eq!(allocator.iter().collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(allocator.num_clauses(), 2);
        assert_eq!(allocator.num_learned_clauses(), 1);
        assert_eq!(allocator[second][0], !literal);
    }
}
