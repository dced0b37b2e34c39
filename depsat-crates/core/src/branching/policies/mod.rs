mod default_policy;
mod priority_queue_policy;
mod undetermined_clause_policy;

pub use default_policy::DefaultPolicy;
pub use priority_queue_policy::PriorityQueuePolicy;
pub use undetermined_clause_policy::UndeterminedClausePolicy;
