use crate::engine::sat::AssignmentSet;
use crate::engine::variables::Literal;
use crate::engine::variables::PropositionalVariable;

/// A complete assignment of the variables of a satisfiable problem.
///
/// It takes ownership of a snapshot of the assignment, so it remains valid after the solver
/// backtracks or receives new clauses.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    assignments: AssignmentSet,
}

impl Solution {
    pub(crate) fn new(assignments: AssignmentSet) -> Self {
        Self { assignments }
    }

    /// The value of `variable`, or [`None`] if the variable is not part of the problem.
    pub fn value(&self, variable: PropositionalVariable) -> Option<bool> {
        self.assignments.get(variable).value()
    }

    pub fn literal_value(&self, literal: Literal) -> Option<bool> {
        self.assignments.value_of(literal)
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    /// The variables and their values, in increasing order of the variables.
    pub fn iter(&self) -> impl Iterator<Item = (PropositionalVariable, bool)> + '_ {
        self.assignments
            .variables()
            .filter_map(|variable| self.value(variable).map(|value| (variable, value)))
    }

    /// For every variable, the literal which is true in this solution.
    pub fn as_literals(&self) -> Vec<Literal> {
        self.iter()
            .map(|(variable, value)| Literal::new(variable, value))
            .collect()
    }

    /// The variables which are true in this solution, i.e. the packages to install.
    pub fn true_literals(&self) -> Vec<Literal> {
        self.iter()
            .filter(|&(_, value)| value)
            .map(|(variable, _)| Literal::new(variable, true))
            .collect()
    }
}
