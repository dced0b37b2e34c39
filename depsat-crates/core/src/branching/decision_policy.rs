use crate::branching::SelectionContext;
use crate::engine::variables::PropositionalVariable;
#[cfg(doc)]
use crate::SatisfactionSolver;

/// A trait for defining the order in which the [`SatisfactionSolver`] decides on variables.
///
/// The solver calls [`DecisionPolicy::get_next_package_id`] exactly once per decision, and never
/// during propagation. If the policy returns a variable which is already assigned, or returns
/// [`None`] while unassigned variables remain, the solver panics.
pub trait DecisionPolicy {
    /// Returns the next variable to decide on; it has to be unassigned.
    fn get_next_package_id(
        &mut self,
        context: &mut SelectionContext,
    ) -> Option<PropositionalVariable>;

    /// The value the solver assigns to the variable returned by
    /// [`DecisionPolicy::get_next_package_id`]. Defaults to installing the package.
    fn select_polarity(&mut self, _variable: PropositionalVariable) -> bool {
        true
    }

    /// Informs the policy of variables which were explicitly requested.
    fn add_requirements(&mut self, _variables: &[PropositionalVariable]) {}
}
