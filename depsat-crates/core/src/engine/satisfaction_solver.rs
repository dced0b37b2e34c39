//! Houses the solver which attempts to find a solution to a set of clauses using conflict driven
//! clause learning.
use std::time::Instant;

use log::debug;

use super::conflict_analysis::LearnedClause;
use super::conflict_analysis::ResolutionConflictAnalyser;
use super::sat::clause_allocators::Clause;
use super::sat::clause_allocators::ClauseAllocator;
use super::sat::clause_allocators::ClauseReference;
use super::sat::clause_allocators::Provenance;
use super::sat::ClausalPropagator;
use super::sat::PropositionalAssignments;
use super::solver_statistics::SolverStatistics;
use super::termination::TerminationCondition;
use super::variables::Literal;
use super::variables::PropositionalVariable;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Solution;
use crate::branching::DecisionPolicy;
use crate::branching::SelectionContext;
use crate::depsat_assert_eq_simple;
use crate::depsat_assert_extreme;
use crate::depsat_assert_moderate;
use crate::depsat_assert_simple;
use crate::results::SatisfactionResult;
use crate::results::UnsatisfiabilityWitness;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// A conflict-driven clause learning solver for clauses over propositional variables.
///
/// The solver keeps the assignment, the trail, the watch lists and the clause arena of a single
/// problem. Clauses can be added at any point outside of [`SatisfactionSolver::solve`]; after
/// solving the solver is always back at the root level.
///
/// # Example
/// ```rust
/// # use depsat_core::SatisfactionSolver;
/// # use depsat_core::branching::DefaultPolicy;
/// # use depsat_core::termination::Indefinite;
/// # use depsat_core::variables::Literal;
/// # use depsat_core::results::SatisfactionResult;
/// let mut solver = SatisfactionSolver::default();
/// let clauses: [&[i32]; 2] = [&[-1, 2], &[1]];
/// for clause in clauses {
///     let literals = clause.iter().map(|&value| Literal::try_from(value).unwrap());
///     solver.add_clause(literals).unwrap();
/// }
///
/// let result = solver.solve(&mut Indefinite, &mut DefaultPolicy::default());
/// let SatisfactionResult::Satisfiable(solution) = result else {
///     panic!("the clauses are satisfiable");
/// };
/// assert_eq!(solution.literal_value(Literal::try_from(2).unwrap()), Some(true));
/// ```
#[derive(Debug)]
pub struct SatisfactionSolver {
    /// The solver continuously changes states during the search.
    /// The state helps track additional information and contributes to making the code clearer.
    state: SatisfactionSolverState,
    assignments: PropositionalAssignments,
    clausal_propagator: ClausalPropagator,
    clause_allocator: ClauseAllocator,
    conflict_analyser: ResolutionConflictAnalyser,
    /// The learned clauses in the order in which they were recorded
    learned_clauses: Vec<ClauseReference>,
    /// Contains the number of decisions, conflicts, etc.
    counters: SolverStatistics,
    options: SatisfactionSolverOptions,
}

/// Options for the [`SatisfactionSolver`] which determine how it treats the clauses it is given.
#[derive(Debug, Clone, Copy)]
pub struct SatisfactionSolverOptions {
    /// Clauses containing both a literal and its negation are always satisfied; when set, such
    /// clauses are not stored. Their variables are registered regardless.
    pub skip_tautologies: bool,
}

impl Default for SatisfactionSolverOptions {
    fn default() -> Self {
        SatisfactionSolverOptions {
            skip_tautologies: true,
        }
    }
}

impl Default for SatisfactionSolver {
    fn default() -> Self {
        SatisfactionSolver::new(SatisfactionSolverOptions::default())
    }
}

// methods that offer basic functionality
impl SatisfactionSolver {
    pub fn new(options: SatisfactionSolverOptions) -> SatisfactionSolver {
        SatisfactionSolver {
            state: SatisfactionSolverState::default(),
            assignments: PropositionalAssignments::default(),
            clausal_propagator: ClausalPropagator::default(),
            clause_allocator: ClauseAllocator::default(),
            conflict_analyser: ResolutionConflictAnalyser::default(),
            learned_clauses: vec![],
            counters: SolverStatistics::default(),
            options,
        }
    }

    /// Creates a solver containing the given rules; every rule is a clause together with an
    /// optional description of where it came from.
    ///
    /// A rule which makes the problem infeasible does not stop the construction; the subsequent
    /// call to [`SatisfactionSolver::solve`] reports the infeasibility.
    pub fn from_rules<Literals>(
        rules: impl IntoIterator<Item = (Literals, Option<Provenance>)>,
    ) -> SatisfactionSolver
    where
        Literals: IntoIterator<Item = Literal>,
    {
        let mut solver = SatisfactionSolver::default();
        for (literals, provenance) in rules {
            // An infeasible rule is recorded in the state of the solver.
            let _ = solver.add_clause_with_provenance(literals, provenance);
        }
        solver
    }

    /// Makes `variable` known to the solver; a solution assigns every registered variable.
    pub fn register_variable(&mut self, variable: PropositionalVariable) {
        self.assignments.register_variable(variable);
        self.clausal_propagator.grow(Literal::new(variable, true));
    }

    pub fn get_decision_level(&self) -> usize {
        self.assignments.get_decision_level()
    }

    pub fn num_assigned(&self) -> usize {
        self.assignments.num_assigned()
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    pub fn num_decisions(&self) -> u64 {
        self.counters.engine_statistics.num_decisions
    }

    pub fn num_conflicts(&self) -> u64 {
        self.counters.engine_statistics.num_conflicts
    }

    /// Returns the literals of every clause learned so far, in the order in which they were
    /// learned. Adding them to a solver for the same problem does not change its verdict.
    pub fn learned_clauses(&self) -> Vec<Vec<Literal>> {
        self.learned_clauses
            .iter()
            .map(|&clause_reference| self.clause_allocator[clause_reference].iter().collect())
            .collect()
    }

    /// Checks `solution` against every clause which was added to the solver, without relying on
    /// any of the propagation structures.
    pub fn validate(&self, solution: &Solution) -> bool {
        self.clause_allocator
            .iter()
            .map(|clause_reference| &self.clause_allocator[clause_reference])
            .filter(|clause| !clause.is_learned())
            .all(|clause| {
                clause
                    .iter()
                    .any(|literal| solution.literal_value(literal) == Some(true))
            })
    }

    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.counters.log(StatisticLogger::default());
        }
    }
}

// methods for adding clauses
impl SatisfactionSolver {
    /// Adds a clause to the solver. See [`SatisfactionSolver::add_clause_with_provenance`].
    pub fn add_clause(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
    ) -> Result<(), ConstraintOperationError> {
        self.add_clause_with_provenance(literals, None)
    }

    /// Adds a clause to the solver, registering all of its variables. The provenance is used to
    /// describe the clause when it takes part in an [`UnsatisfiabilityWitness`].
    ///
    /// Returns [`ConstraintOperationError::InfeasibleClause`] if the clause is empty or is
    /// falsified at the root level, after which every call to [`SatisfactionSolver::solve`]
    /// reports unsatisfiability. Once the solver is infeasible, adding clauses results in
    /// [`ConstraintOperationError::InfeasibleState`].
    pub fn add_clause_with_provenance(
        &mut self,
        literals: impl IntoIterator<Item = Literal>,
        provenance: Option<Provenance>,
    ) -> Result<(), ConstraintOperationError> {
        if self.state.is_infeasible() {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        depsat_assert_simple!(
            self.assignments.is_at_the_root_level(),
            "Clauses can only be added at the root level"
        );

        let clause = Clause::with_provenance(literals, false, provenance);
        for literal in clause.iter() {
            self.register_variable(literal.get_propositional_variable());
        }

        if self.options.skip_tautologies && clause.is_tautology() {
            debug!("Skipping tautology {clause}");
            return Ok(());
        }

        let clause_reference = self.clause_allocator.create_clause(clause);
        if let Some(conflict) = self.clausal_propagator.add_clause(
            clause_reference,
            &mut self.assignments,
            &mut self.clause_allocator,
        ) {
            debug!(
                "Clause {} is infeasible at the root",
                self.clause_allocator[conflict]
            );
            self.state.declare_infeasible(conflict);
            return Err(ConstraintOperationError::InfeasibleClause);
        }

        Ok(())
    }
}

// methods that serve as the main building blocks of the search
impl SatisfactionSolver {
    /// Searches for an assignment to the registered variables which satisfies every clause.
    ///
    /// The `policy` is consulted whenever a decision has to be made and `termination` is polled
    /// once per iteration of the search. When the search ends the solver returns to the root
    /// level, regardless of the result.
    pub fn solve(
        &mut self,
        termination: &mut impl TerminationCondition,
        policy: &mut impl DecisionPolicy,
    ) -> SatisfactionResult {
        if let Some(conflict) = self.state.get_infeasible_conflict() {
            return SatisfactionResult::Unsatisfiable(self.create_witness(conflict));
        }

        let start_time = Instant::now();
        self.state.declare_solving();
        let result = self.solve_internal(termination, policy);
        self.counters.engine_statistics.time_spent_in_solver +=
            start_time.elapsed().as_millis() as u64;

        result
    }

    fn solve_internal(
        &mut self,
        termination: &mut impl TerminationCondition,
        policy: &mut impl DecisionPolicy,
    ) -> SatisfactionResult {
        loop {
            if termination.should_stop() {
                self.state.declare_timeout();
                self.restore_root();
                return SatisfactionResult::Unknown;
            }

            self.propagate();

            if let Some(conflict) = self.state.get_conflict() {
                if self.assignments.is_at_the_root_level() {
                    debug!(
                        "Conflict on clause {} at the root level",
                        self.clause_allocator[conflict]
                    );
                    self.state.declare_infeasible(conflict);
                    return SatisfactionResult::Unsatisfiable(self.create_witness(conflict));
                }

                self.resolve_conflict(conflict);
                self.state.declare_solving();
            } else if self.assignments.num_assigned() == self.assignments.num_variables() {
                let solution = Solution::new(self.assignments.assignment_set().clone());
                self.state.declare_solution_found();
                self.restore_root();
                return SatisfactionResult::Satisfiable(solution);
            } else {
                self.make_next_decision(termination, policy);
            }
        }
    }

    fn make_next_decision(
        &mut self,
        termination: &mut impl TerminationCondition,
        policy: &mut impl DecisionPolicy,
    ) {
        let num_unassigned = self.assignments.num_variables() - self.assignments.num_assigned();

        let mut context = SelectionContext::new(
            self.assignments.assignment_set_mut(),
            &self.clause_allocator,
        );
        let Some(variable) = policy.get_next_package_id(&mut context) else {
            panic!("The decision policy did not select a variable while {num_unassigned} variables are unassigned");
        };
        depsat_assert_simple!(
            self.assignments.is_registered(variable)
                && !self.assignments.is_variable_assigned(variable),
            "The decision policy selected {variable}, which is not an unassigned variable"
        );

        let polarity = policy.select_polarity(variable);
        self.assume(Literal::new(variable, polarity));

        termination.decision_has_been_made();
        self.counters.engine_statistics.num_decisions += 1;
    }

    /// Opens a new decision level on which `literal` is assigned true.
    pub(crate) fn assume(&mut self, literal: Literal) {
        depsat_assert_simple!(self.assignments.is_literal_unassigned(literal));
        self.assignments.increase_decision_level();
        let _ = self.assignments.enqueue(literal, None);
    }

    /// Undoes every assignment made on a decision level beyond `decision_level`.
    pub(crate) fn cancel_until(&mut self, decision_level: usize) {
        depsat_assert_simple!(decision_level <= self.assignments.get_decision_level());
        self.assignments.cancel_until(decision_level);
        self.clausal_propagator
            .synchronise(self.assignments.num_trail_entries());
    }

    fn restore_root(&mut self) {
        self.cancel_until(0);
    }

    fn propagate(&mut self) {
        let num_trail_entries_before = self.assignments.num_trail_entries();

        let conflict = self
            .clausal_propagator
            .propagate(&mut self.assignments, &mut self.clause_allocator);

        self.counters.engine_statistics.num_propagations +=
            (self.assignments.num_trail_entries() - num_trail_entries_before) as u64;

        if let Some(conflict) = conflict {
            self.counters.engine_statistics.num_conflicts += 1;
            self.state.declare_conflict(conflict);
        } else {
            depsat_assert_extreme!(self
                .clausal_propagator
                .debug_check_state(&self.assignments, &self.clause_allocator));
        }
    }

    fn resolve_conflict(&mut self, conflict: ClauseReference) {
        let learned_clause =
            self.conflict_analyser
                .compute_1uip(conflict, &self.assignments, &self.clause_allocator);

        let current_level = self.assignments.get_decision_level();
        depsat_assert_moderate!(learned_clause.backjump_level < current_level);

        let statistics = &mut self.counters.learned_clause_statistics;
        statistics
            .average_learned_clause_length
            .add_term(learned_clause.literals.len() as u64);
        statistics
            .average_backtrack_amount
            .add_term((current_level - learned_clause.backjump_level) as u64);
        if learned_clause.literals.len() == 1 {
            statistics.num_unit_clauses_learned += 1;
        }

        self.cancel_until(learned_clause.backjump_level);
        self.record(learned_clause);
    }

    /// Stores the learned clause and propagates its asserting literal.
    ///
    /// The asserting literal is moved to the front and the literal which was assigned last among
    /// the others is moved to the second position, so both watches are valid after the
    /// backjump.
    fn record(&mut self, learned_clause: LearnedClause) {
        let asserting_literal = learned_clause.asserting_literal();
        let LearnedClause {
            mut literals,
            antecedents,
            ..
        } = learned_clause;

        let last_index = literals.len() - 1;
        literals.swap(0, last_index);
        depsat_assert_eq_simple!(literals[0], asserting_literal);

        if literals.len() > 2 {
            let mut highest_index = 1;
            for index in 2..literals.len() {
                if self.level_of(literals[index]) > self.level_of(literals[highest_index]) {
                    highest_index = index;
                }
            }
            literals.swap(1, highest_index);
        }

        let clause_reference = self
            .clause_allocator
            .create_clause(Clause::learned_from(literals, antecedents));
        self.clausal_propagator
            .add_learned_clause(clause_reference, &self.clause_allocator);
        self.learned_clauses.push(clause_reference);

        let enqueued = self
            .assignments
            .enqueue(asserting_literal, Some(clause_reference));
        depsat_assert_simple!(
            enqueued,
            "The asserting literal {asserting_literal} is false after backjumping"
        );
    }

    fn level_of(&self, literal: Literal) -> usize {
        self.assignments
            .get_variable_assignment_level(literal.get_propositional_variable())
    }

    /// Analyses a conflict at the root level and captures the clauses and the reasons of the
    /// root assignments which explain it.
    fn create_witness(&mut self, conflict: ClauseReference) -> UnsatisfiabilityWitness {
        depsat_assert_eq_simple!(self.assignments.get_decision_level(), 0);

        let learned_clause = if self.clause_allocator[conflict].is_empty() {
            None
        } else {
            let analysis =
                self.conflict_analyser
                    .compute_1uip(conflict, &self.assignments, &self.clause_allocator);
            Some(Clause::learned_from(analysis.literals, analysis.antecedents))
        };

        let implications = (0..self.assignments.num_trail_entries())
            .map(|index| self.assignments.get_trail_entry(index))
            .map(|literal| {
                (
                    literal,
                    self.assignments
                        .get_variable_reason(literal.get_propositional_variable()),
                )
            })
            .collect::<Vec<_>>();

        UnsatisfiabilityWitness::new(
            self.clause_allocator.clone(),
            implications,
            conflict,
            learned_clause,
        )
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
enum SatisfactionSolverStateInternal {
    #[default]
    Ready,
    Solving,
    ContainsSolution,
    Conflict {
        conflict: ClauseReference,
    },
    Infeasible {
        conflict: ClauseReference,
    },
    Timeout,
}

#[derive(Default, Debug)]
struct SatisfactionSolverState {
    internal_state: SatisfactionSolverStateInternal,
}

impl SatisfactionSolverState {
    fn is_ready(&self) -> bool {
        matches!(self.internal_state, SatisfactionSolverStateInternal::Ready)
    }

    fn no_conflict(&self) -> bool {
        !self.is_conflicting()
    }

    fn is_conflicting(&self) -> bool {
        matches!(
            self.internal_state,
            SatisfactionSolverStateInternal::Conflict { .. }
        )
    }

    fn is_infeasible(&self) -> bool {
        matches!(
            self.internal_state,
            SatisfactionSolverStateInternal::Infeasible { .. }
        )
    }

    fn is_solving(&self) -> bool {
        matches!(self.internal_state, SatisfactionSolverStateInternal::Solving)
    }

    fn get_conflict(&self) -> Option<ClauseReference> {
        match self.internal_state {
            SatisfactionSolverStateInternal::Conflict { conflict } => Some(conflict),
            _ => None,
        }
    }

    fn get_infeasible_conflict(&self) -> Option<ClauseReference> {
        match self.internal_state {
            SatisfactionSolverStateInternal::Infeasible { conflict } => Some(conflict),
            _ => None,
        }
    }

    fn declare_solving(&mut self) {
        depsat_assert_simple!(!self.is_infeasible());
        self.internal_state = SatisfactionSolverStateInternal::Solving;
    }

    fn declare_conflict(&mut self, conflict: ClauseReference) {
        depsat_assert_simple!(self.is_solving());
        self.internal_state = SatisfactionSolverStateInternal::Conflict { conflict };
    }

    fn declare_infeasible(&mut self, conflict: ClauseReference) {
        depsat_assert_simple!(!self.is_infeasible());
        self.internal_state = SatisfactionSolverStateInternal::Infeasible { conflict };
    }

    fn declare_solution_found(&mut self) {
        depsat_assert_simple!(self.no_conflict());
        self.internal_state = SatisfactionSolverStateInternal::ContainsSolution;
    }

    fn declare_timeout(&mut self) {
        depsat_assert_simple!(self.is_solving() || self.is_ready());
        self.internal_state = SatisfactionSolverStateInternal::Timeout;
    }
}
