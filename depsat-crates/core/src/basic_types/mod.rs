mod constraint_operation_error;
mod cumulative_moving_average;
mod solution;
mod trail;

pub use constraint_operation_error::ConstraintOperationError;
pub use cumulative_moving_average::CumulativeMovingAverage;
pub use solution::Solution;
pub(crate) use trail::Trail;
