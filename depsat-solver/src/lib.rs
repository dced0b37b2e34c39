//! # depsat
//! depsat is a conflict-driven clause learning SAT solver for package dependency resolution.
//!
//! A dependency problem is stated as clauses over propositional variables, where a variable
//! typically stands for "this version of this package is installed". Every clause can carry a
//! provenance describing the rule it came from, such that an unsatisfiable problem is explained
//! in terms of those rules.
//!
//! ```rust
//! # use depsat_solver::SatisfactionSolver;
//! # use depsat_solver::branching::UndeterminedClausePolicy;
//! # use depsat_solver::clauses::Provenance;
//! # use depsat_solver::results::SatisfactionResult;
//! # use depsat_solver::termination::Indefinite;
//! # use depsat_solver::variables::Literal;
//! # use depsat_solver::variables::PropositionalVariable;
//! let app = PropositionalVariable::new(1);
//! let library_v1 = PropositionalVariable::new(2);
//! let library_v2 = PropositionalVariable::new(3);
//!
//! let mut solver = SatisfactionSolver::default();
//! // The application has to be installed.
//! solver
//!     .add_clause_with_provenance(
//!         [Literal::new(app, true)],
//!         Some(Provenance::from("install app")),
//!     )
//!     .expect("not infeasible");
//! // The application depends on some version of the library.
//! solver
//!     .add_clause_with_provenance(
//!         [
//!             Literal::new(app, false),
//!             Literal::new(library_v1, true),
//!             Literal::new(library_v2, true),
//!         ],
//!         Some(Provenance::from("app depends on library")),
//!     )
//!     .expect("not infeasible");
//! // At most one version of the library is installed.
//! solver
//!     .add_clause([Literal::new(library_v1, false), Literal::new(library_v2, false)])
//!     .expect("not infeasible");
//!
//! let mut policy = UndeterminedClausePolicy::new(true);
//! let result = solver.solve(&mut Indefinite, &mut policy);
//! let SatisfactionResult::Satisfiable(solution) = result else {
//!     panic!("the dependencies can be resolved");
//! };
//! assert_eq!(solution.value(app), Some(true));
//! assert_ne!(solution.value(library_v1), solution.value(library_v2));
//! ```
//!
//! When the problem has no solution, the [`results::UnsatisfiabilityWitness`] lists the rules
//! which are in conflict:
//! ```rust
//! # use depsat_solver::SatisfactionSolver;
//! # use depsat_solver::branching::DefaultPolicy;
//! # use depsat_solver::clauses::Provenance;
//! # use depsat_solver::results::SatisfactionResult;
//! # use depsat_solver::termination::Indefinite;
//! # use depsat_solver::variables::Literal;
//! # use depsat_solver::variables::PropositionalVariable;
//! let app = Literal::new(PropositionalVariable::new(1), true);
//! let library = Literal::new(PropositionalVariable::new(2), true);
//!
//! let mut solver = SatisfactionSolver::from_rules([
//!     (vec![app], Some(Provenance::from("install app"))),
//!     (vec![!app, library], Some(Provenance::from("app depends on library"))),
//!     (vec![!library], Some(Provenance::from("library is broken"))),
//! ]);
//!
//! let result = solver.solve(&mut Indefinite, &mut DefaultPolicy::default());
//! let SatisfactionResult::Unsatisfiable(witness) = result else {
//!     panic!("the dependencies cannot be resolved");
//! };
//! assert_eq!(witness.conflict_requirements().len(), 3);
//! println!("{witness}");
//! ```
pub use depsat_core::*;
