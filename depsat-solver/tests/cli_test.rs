#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::instance_path;
use helpers::run_solver;
use helpers::run_solver_with_options;
use regex::Regex;

fn options(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}

#[test]
fn satisfiable_instance_prints_the_assignment() {
    let output = run_solver(instance_path("chain.cnf"));

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("s SATISFIABLE"));

    let values = Regex::new(r"(?m)^v ((?:-?\d+ )*)0$").unwrap();
    let captures = values
        .captures(&output.stdout)
        .expect("the assignment is printed");
    assert_eq!(&captures[1], "1 2 3 4 ");
}

#[test]
fn root_conflict_is_explained_by_input_clauses() {
    let output = run_solver(instance_path("root_conflict.cnf"));

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("s UNSATISFIABLE"));
    assert!(output.stdout.contains("c Conflicting requirements:"));
    for clause in 1..=3 {
        assert!(
            output
                .stdout
                .contains(&format!("c input clause #{clause}")),
            "clause {clause} is missing from\n{}",
            output.stdout
        );
    }
}

#[test]
fn every_policy_proves_unsatisfiability() {
    for policy in ["default", "undetermined-clause", "priority-queue"] {
        let output = run_solver_with_options(
            instance_path("pigeonhole_3_2.cnf"),
            options(&["--policy", policy]),
        );

        assert!(output.success, "{}", output.stderr);
        assert!(
            output.stdout.contains("s UNSATISFIABLE"),
            "policy {policy} printed\n{}",
            output.stdout
        );
    }
}

#[test]
fn exhausted_decision_limit_is_unknown() {
    let output = run_solver_with_options(
        instance_path("pigeonhole_3_2.cnf"),
        options(&["--decision-limit", "0"]),
    );

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("s UNKNOWN"));
}

#[test]
fn statistics_are_logged_on_request() {
    let output = run_solver_with_options(
        instance_path("pigeonhole_3_2.cnf"),
        options(&["--log-statistics"]),
    );

    assert!(output.success, "{}", output.stderr);
    let decisions = Regex::new(r"(?m)^c STAT engine_statistics_num_decisions=\d+$").unwrap();
    assert!(decisions.is_match(&output.stdout), "{}", output.stdout);
    let conflicts = Regex::new(r"(?m)^c STAT engine_statistics_num_conflicts=[1-9]\d*$").unwrap();
    assert!(conflicts.is_match(&output.stdout), "{}", output.stdout);
}

#[test]
fn policy_decisions_are_printed_as_comments() {
    let output = run_solver_with_options(
        instance_path("chain.cnf"),
        options(&["--log-policy", "--policy", "undetermined-clause"]),
    );

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("s SATISFIABLE"));
    let non_comment = output
        .stdout
        .lines()
        .filter(|line| !line.starts_with("c ") && !line.trim().is_empty())
        .collect::<Vec<_>>();
    assert_eq!(non_comment.len(), 2, "{non_comment:?}");
}

#[test]
fn malformed_instance_fails() {
    let output = run_solver(instance_path("malformed.cnf"));

    assert!(!output.success);
    assert!(output.stdout.contains("Execution failed"));
    assert!(output.stdout.contains("unexpected character 'x'"));
}

#[test]
fn unsupported_file_extension_fails() {
    let output = run_solver(instance_path("instance.txt"));

    assert!(!output.success);
    assert!(output.stdout.contains("is not supported"));
}
