mod os_signal_termination;
mod parsers;
mod result;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::ValueEnum;
use depsat_solver::branching::DecisionPolicy;
use depsat_solver::branching::DefaultPolicy;
use depsat_solver::branching::PolicyLogger;
use depsat_solver::branching::PriorityQueuePolicy;
use depsat_solver::branching::UndeterminedClausePolicy;
use depsat_solver::convert_case::Case;
use depsat_solver::results::SatisfactionResult;
use depsat_solver::statistics::configure_statistic_logging;
use depsat_solver::statistics::log_statistic_postfix;
use depsat_solver::termination::Combinator;
use depsat_solver::termination::DecisionBudget;
use depsat_solver::termination::TerminationCondition;
use depsat_solver::termination::TimeBudget;
use depsat_solver::SatisfactionSolver;
use depsat_solver::SatisfactionSolverOptions;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use parsers::dimacs::parse_cnf;
use parsers::dimacs::SolverDimacsSink;
use result::DepsatError;
use result::DepsatResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The instance to solve, given in the DIMACS CNF format ('*.cnf').
    #[clap(verbatim_doc_comment)]
    instance_path: PathBuf,

    /// The decision policy which determines the order in which the variables are decided.
    ///
    /// - "default" decides on the unassigned variable with the lowest id
    /// - "undetermined-clause" decides on a variable of a clause which is not yet satisfied
    /// - "priority-queue" decides on the unassigned variable with the highest priority
    #[arg(long, value_enum, default_value_t, verbatim_doc_comment)]
    policy: PolicyType,

    /// The time budget for the solver, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The maximum number of decisions the solver is allowed to make.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "decision-limit", verbatim_doc_comment)]
    decision_limit: Option<u64>,

    /// Keeps clauses which contain both a literal and its negation instead of skipping them.
    ///
    /// Possible values: bool
    #[arg(long = "keep-tautologies", verbatim_doc_comment)]
    keep_tautologies: bool,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,

    /// Prints the decisions made by the decision policy, as a histogram and as a report of the
    /// assignment changes observed before every decision.
    ///
    /// Possible values: bool
    #[arg(long = "log-policy", verbatim_doc_comment)]
    log_policy: bool,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyType {
    /// Decide on the unassigned variable with the lowest id.
    #[default]
    Default,
    /// Decide on a variable occurring in a clause which is not yet satisfied.
    UndeterminedClause,
    /// Decide on the unassigned variable with the highest priority.
    PriorityQueue,
}

fn configure_logging(verbose: bool, log_statistics: bool) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging("c STAT", None, Some(Case::Snake), None);
    }

    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> DepsatResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics)?;

    if depsat_solver::asserts::DEPSAT_ASSERT_LEVEL_DEFINITION
        >= depsat_solver::asserts::DEPSAT_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the depsat assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            depsat_solver::asserts::DEPSAT_ASSERT_LEVEL_DEFINITION
        );
    };

    match args.instance_path.extension().and_then(|ext| ext.to_str()) {
        Some("cnf") => {}
        _ => return Err(DepsatError::invalid_instance(args.instance_path.display())),
    }

    let options = SatisfactionSolverOptions {
        skip_tautologies: !args.keep_tautologies,
    };
    let instance = File::open(&args.instance_path)?;
    let solver = parse_cnf::<SolverDimacsSink>(instance, options)?;

    let termination = Combinator::new(
        OsSignal::install(),
        Combinator::new(
            args.time_limit
                .map(|time_limit| TimeBudget::starting_now(Duration::from_millis(time_limit))),
            args.decision_limit.map(DecisionBudget::new),
        ),
    );

    match args.policy {
        PolicyType::Default => solve(solver, termination, DefaultPolicy::default(), &args),
        PolicyType::UndeterminedClause => solve(
            solver,
            termination,
            UndeterminedClausePolicy::new(true),
            &args,
        ),
        PolicyType::PriorityQueue => {
            solve(solver, termination, PriorityQueuePolicy::new(true), &args)
        }
    }

    Ok(())
}

fn solve(
    mut solver: SatisfactionSolver,
    mut termination: impl TerminationCondition,
    policy: impl DecisionPolicy,
    args: &Args,
) {
    let result = if args.log_policy {
        let mut policy_logger = PolicyLogger::new(policy);
        let result = solver.solve(&mut termination, &mut policy_logger);

        for line in policy_logger
            .format_histogram()
            .lines()
            .chain(policy_logger.report(args.verbose).lines())
        {
            println!("c {line}");
        }

        result
    } else {
        let mut policy = policy;
        solver.solve(&mut termination, &mut policy)
    };

    match result {
        SatisfactionResult::Satisfiable(solution) => {
            if !solver.validate(&solution) {
                error!("The solution does not satisfy every input clause");
            }

            println!("s SATISFIABLE");
            let values = solution
                .as_literals()
                .into_iter()
                .map(|literal| literal.to_string())
                .collect::<Vec<_>>();
            println!("v {} 0", values.join(" "));
        }
        SatisfactionResult::Unsatisfiable(witness) => {
            println!("s UNSATISFIABLE");
            for line in witness.to_string().lines() {
                println!("c {line}");
            }
        }
        SatisfactionResult::Unknown => println!("s UNKNOWN"),
    }

    if args.log_statistics {
        solver.log_statistics();
        log_statistic_postfix();
    }
}
