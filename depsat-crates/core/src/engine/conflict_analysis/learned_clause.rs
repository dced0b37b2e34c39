use crate::engine::sat::clause_allocators::ClauseReference;
use crate::engine::variables::Literal;

#[derive(Clone, Debug)]
pub(crate) struct LearnedClause {
    /// The literals of the clause; the asserting literal is the last one
    pub(crate) literals: Vec<Literal>,
    pub(crate) backjump_level: usize,
    /// The clauses which were resolved to derive the clause, starting with the conflict
    pub(crate) antecedents: Vec<ClauseReference>,
}

impl LearnedClause {
    pub(crate) fn asserting_literal(&self) -> Literal {
        self.literals[self.literals.len() - 1]
    }
}
