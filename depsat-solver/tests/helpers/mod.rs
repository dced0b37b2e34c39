//! Helpers to run the solver binary and the solver library in integration tests.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::time::Duration;

use depsat_solver::results::SatisfactionResult;
use depsat_solver::variables::Literal;
use depsat_solver::SatisfactionSolver;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use wait_timeout::ChildExt;

/// The output of a run of the solver binary.
#[derive(Debug)]
pub(crate) struct SolverOutput {
    pub(crate) success: bool,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

pub(crate) fn instance_path(instance_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("instances")
        .join(instance_name)
}

pub(crate) fn run_solver(instance_path: impl AsRef<Path>) -> SolverOutput {
    run_solver_with_options(instance_path, std::iter::empty())
}

pub(crate) fn run_solver_with_options(
    instance_path: impl AsRef<Path>,
    args: impl IntoIterator<Item = String>,
) -> SolverOutput {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let solver = PathBuf::from(env!("CARGO_BIN_EXE_depsat-solver"));

    let mut command = Command::new(solver);
    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(instance_path.as_ref())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => {
            let _ = child.kill();
            panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs())
        }
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let output = child
        .wait_with_output()
        .expect("Failed to collect the solver output.");

    SolverOutput {
        success: status.success(),
        stdout: String::from_utf8(output.stdout).expect("stdout is valid utf-8"),
        stderr: String::from_utf8(output.stderr).expect("stderr is valid utf-8"),
    }
}

pub(crate) fn lit(value: i32) -> Literal {
    Literal::try_from(value).expect("non-zero literal")
}

/// Creates a solver containing the given clauses, ignoring infeasibility at the root which is
/// reported by the subsequent call to solve.
pub(crate) fn solver_for(clauses: &[Vec<i32>]) -> SatisfactionSolver {
    let mut solver = SatisfactionSolver::default();
    for clause in clauses {
        let _ = solver.add_clause(clause.iter().map(|&value| lit(value)));
    }
    solver
}

/// A random formula over `num_variables` variables where every clause has between one and three
/// literals.
pub(crate) fn random_cnf(
    rng: &mut SmallRng,
    num_variables: u32,
    num_clauses: usize,
) -> Vec<Vec<i32>> {
    (0..num_clauses)
        .map(|_| {
            let length = rng.gen_range(1..=3);
            (0..length)
                .map(|_| {
                    let variable = rng.gen_range(1..=num_variables) as i32;
                    if rng.gen_bool(0.5) {
                        variable
                    } else {
                        -variable
                    }
                })
                .collect()
        })
        .collect()
}

pub(crate) fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Decides satisfiability by enumerating every assignment of the variables.
pub(crate) fn brute_force_is_satisfiable(clauses: &[Vec<i32>], num_variables: u32) -> bool {
    (0_u64..1 << num_variables).any(|assignment| {
        clauses.iter().all(|clause| {
            clause.iter().any(|&value| {
                let is_true = assignment & (1 << (value.unsigned_abs() - 1)) != 0;
                is_true == (value > 0)
            })
        })
    })
}

/// Checks the solution of a satisfiable result against the clauses, independently of the solver.
pub(crate) fn satisfies(result: &SatisfactionResult, clauses: &[Vec<i32>]) -> bool {
    let SatisfactionResult::Satisfiable(solution) = result else {
        return false;
    };

    clauses.iter().all(|clause| {
        clause
            .iter()
            .any(|&value| solution.literal_value(lit(value)) == Some(true))
    })
}
