use std::fmt::Display;
use std::ops::Index;
use std::sync::Arc;

use itertools::Itertools;

use super::ClauseReference;
use crate::containers::HashSet;
use crate::engine::variables::Literal;

/// An opaque, human-readable label of the rule a clause was generated from.
///
/// Provenance is only used to explain unsatisfiability; the engine never inspects it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Provenance(Arc<str>);

impl Provenance {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Provenance {
    fn from(value: &str) -> Self {
        Provenance(Arc::from(value))
    }
}

impl From<String> for Provenance {
    fn from(value: String) -> Self {
        Provenance(Arc::from(value))
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A disjunction of literals without duplicates.
///
/// The content of a clause never changes after creation; only the positions of its literals are
/// permuted, since the first two positions are the watched literals.
#[derive(Clone, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
    is_learned: bool,
    provenance: Option<Provenance>,
    /// The clauses which were resolved to derive this clause; empty for input clauses
    antecedents: Vec<ClauseReference>,
}

impl Clause {
    /// Creates a clause from `literals`, removing duplicates while keeping the order in which the
    /// literals first occur.
    pub fn new(literals: impl IntoIterator<Item = Literal>, is_learned: bool) -> Clause {
        let mut seen: HashSet<Literal> = HashSet::default();
        let literals = literals
            .into_iter()
            .filter(|literal| seen.insert(*literal))
            .collect();

        Clause {
            literals,
            is_learned,
            provenance: None,
            antecedents: vec![],
        }
    }

    pub fn with_provenance(
        literals: impl IntoIterator<Item = Literal>,
        is_learned: bool,
        provenance: Option<Provenance>,
    ) -> Clause {
        let mut clause = Clause::new(literals, is_learned);
        clause.provenance = provenance;
        clause
    }

    pub(crate) fn learned_from(
        literals: impl IntoIterator<Item = Literal>,
        antecedents: Vec<ClauseReference>,
    ) -> Clause {
        let mut clause = Clause::new(literals, true);
        clause.antecedents = antecedents;
        clause
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn is_learned(&self) -> bool {
        self.is_learned
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    pub fn antecedents(&self) -> &[ClauseReference] {
        &self.antecedents
    }

    /// Returns true if the clause contains both a literal and its negation.
    pub fn is_tautology(&self) -> bool {
        let literals: HashSet<Literal> = self.literals.iter().copied().collect();
        self.literals.iter().any(|literal| literals.contains(&!*literal))
    }

    /// The negation of every literal except `excluding`; when every literal of the clause is
    /// false, this is the conjunction which implies `excluding`.
    pub fn calculate_reason(
        &self,
        excluding: Option<Literal>,
    ) -> impl Iterator<Item = Literal> + '_ {
        self.literals
            .iter()
            .filter(move |&&literal| Some(literal) != excluding)
            .map(|&literal| !literal)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.literals.swap(a, b);
    }

    pub fn get_literal_slice(&self) -> &[Literal] {
        &self.literals
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }
}

impl Index<usize> for Clause {
    type Output = Literal;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.literals.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literals(values: &[i32]) -> Vec<Literal> {
        values
            .iter()
            .map(|&value| Literal::try_from(value).unwrap())
            .collect()
    }

    #[test]
    fn duplicates_are_removed_keeping_first_occurrence() {
        let clause = Clause::new(literals(&[3, -1, 3, 2, -1]), false);
        assert_eq!(clause.get_literal_slice(), literals(&[3, -1, 2]).as_slice());
    }

    #[test]
    fn tautology_is_detected() {
        assert!(Clause::new(literals(&[1, 2, -1]), false).is_tautology());
        assert!(!Clause::new(literals(&[1, 2, -3]), false).is_tautology());
    }

    #[test]
    fn reason_negates_all_but_the_excluded_literal() {
        let clause = Clause::new(literals(&[1, -2, 3]), false);

        let reason = clause
            .calculate_reason(Some(Literal::try_from(-2).unwrap()))
            .collect::<Vec<_>>();
        assert_eq!(reason, literals(&[-1, -3]));

        let reason = clause.calculate_reason(None).collect::<Vec<_>>();
        assert_eq!(reason, literals(&[-1, 2, -3]));
    }

    #[test]
    fn display_lists_signed_literals() {
        let clause = Clause::new(literals(&[1, -2, 3]), false);
        assert_eq!(clause.to_string(), "[1, -2, 3]");
        assert_eq!(Clause::new(vec![], false).to_string(), "[]");
    }

    #[test]
    fn unit_and_empty_clauses() {
        assert!(Clause::new(literals(&[4]), false).is_unit());
        assert!(Clause::new(vec![], false).is_empty());
    }
}
