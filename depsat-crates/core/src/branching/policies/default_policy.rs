use crate::branching::DecisionPolicy;
use crate::branching::SelectionContext;
use crate::engine::variables::PropositionalVariable;

/// A [`DecisionPolicy`] which decides on the unassigned variable with the lowest id.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl DecisionPolicy for DefaultPolicy {
    fn get_next_package_id(
        &mut self,
        context: &mut SelectionContext,
    ) -> Option<PropositionalVariable> {
        context.unassigned_variables().next()
    }
}
