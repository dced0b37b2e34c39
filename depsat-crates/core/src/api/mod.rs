pub mod results;

pub mod termination {
    //! Contains the conditions under which the solver gives up searching; see
    //! [`TerminationCondition`].
    pub use crate::engine::termination::*;
}

pub mod variables {
    //! Contains the variables and literals out of which clauses are built.
    pub use crate::engine::variables::*;
}

pub mod clauses {
    //! Contains the clauses of the solver and the arena in which they are stored.
    pub use crate::engine::sat::clause_allocators::*;
}

pub mod assignments {
    //! Contains the assignment of the variables which decision policies observe.
    pub use crate::engine::sat::AssignmentChange;
    pub use crate::engine::sat::AssignmentSet;
    pub use crate::engine::sat::VariableState;
}
