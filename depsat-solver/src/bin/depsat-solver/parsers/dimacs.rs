//! This module provides a parser for the DIMACS CNF file format. Given that DIMACS files can be
//! very large, the implementation is designed to read the file in chunks. The parser also will not
//! allocate for every encountered clause, but rather re-use its buffers.
//!
//! The parser is invoked through [`parse_cnf`], which operates on a type that implements the
//! [`DimacsSink`] trait; the sink receives the clauses as they are parsed.
//!
//! It should be noted that the parser should not be used as a DIMACS validator. Even though it
//! should only accept valid DIMACS files, the errors are not extremely detailed.
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::num::NonZeroI32;
use std::str::FromStr;

use depsat_solver::clauses::Provenance;
use depsat_solver::variables::Literal;
use depsat_solver::variables::PropositionalVariable;
use depsat_solver::SatisfactionSolver;
use depsat_solver::SatisfactionSolverOptions;
use log::debug;
use thiserror::Error;

/// A dimacs sink stores a set of clauses over a known number of variables.
pub(crate) trait DimacsSink {
    /// The arguments to the dimacs sink.
    type ConstructorArgs;

    /// The underlying formula type.
    type Formula;

    /// Create an empty formula over variables `1..=num_variables`.
    fn empty(args: Self::ConstructorArgs, num_variables: usize) -> Self;

    /// Add a new clause to the formula. Consistency does not have to be checked at every
    /// insertion.
    fn add_clause(&mut self, clause: &[NonZeroI32]);

    /// Take the collected clauses and turn it into the underlying formula type.
    fn into_formula(self) -> Self::Formula;
}

#[derive(Debug, Error)]
pub(crate) enum DimacsParseError {
    #[error("failed to read file")]
    Io(#[from] std::io::Error),

    #[error("missing dimacs header")]
    MissingHeader,

    #[error("'{0}' is an invalid header")]
    InvalidHeader(String),

    #[error("multiple dimacs headers found")]
    DuplicateHeader,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("'{0}' is an invalid DIMACS literal")]
    InvalidLiteral(String),

    #[error("the last clause in the source is not terminated with a '0'")]
    UnterminatedClause,

    #[error("expected to parse {expected} clauses, but parsed {parsed}")]
    IncorrectClauseCount { expected: usize, parsed: usize },
}

pub(crate) fn parse_cnf<Sink: DimacsSink>(
    source: impl Read,
    sink_constructor_args: Sink::ConstructorArgs,
) -> Result<Sink::Formula, DimacsParseError> {
    let mut reader = BufReader::new(source);
    let mut parser = DimacsParser::<Sink>::new(sink_constructor_args);

    loop {
        let num_bytes = {
            let data = reader.fill_buf()?;

            if data.is_empty() {
                return parser.complete();
            }

            parser.parse_chunk(data)?;
            data.len()
        };

        reader.consume(num_bytes);
    }
}

struct DimacsParser<Sink: DimacsSink> {
    sink_constructor_args: Option<Sink::ConstructorArgs>,
    sink: Option<Sink>,
    header: Option<CnfHeader>,
    buffer: String,
    clause: Vec<NonZeroI32>,
    state: ParseState,
    parsed_clauses: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseState {
    StartLine,
    Header,
    Comment,
    Literal,
    NegativeLiteral,
    Clause,
}

impl<Sink: DimacsSink> DimacsParser<Sink> {
    fn new(sink_constructor_args: Sink::ConstructorArgs) -> Self {
        DimacsParser {
            sink_constructor_args: Some(sink_constructor_args),
            sink: None,
            header: None,
            buffer: String::new(),
            clause: vec![],
            state: ParseState::StartLine,
            parsed_clauses: 0,
        }
    }

    /// Parse the next chunk of bytes. This may start in the middle of parsing a clause or file
    /// header, and may end in such a state as well.
    fn parse_chunk(&mut self, chunk: &[u8]) -> Result<(), DimacsParseError> {
        for &byte in chunk {
            match self.state {
                ParseState::StartLine => match byte {
                    b if b.is_ascii_whitespace() => {}

                    b'p' => {
                        self.state = ParseState::Header;
                        self.buffer.clear();
                        self.buffer.push('p');
                    }

                    b'c' => self.state = ParseState::Comment,

                    b @ b'1'..=b'9' => self.start_literal(b, true),

                    // An empty clause, or the terminator of a clause spanning multiple lines.
                    b'0' => self.finish_clause()?,

                    b'-' => self.start_literal(b'-', false),

                    b => return Err(DimacsParseError::UnexpectedCharacter(b as char)),
                },

                ParseState::Header => match byte {
                    b'\n' => {
                        self.init_formula()?;
                        self.state = ParseState::StartLine;
                    }

                    b => self.buffer.push(b as char),
                },

                ParseState::Comment => {
                    if byte == b'\n' {
                        self.state = ParseState::StartLine;
                    }
                }

                ParseState::Literal => match byte {
                    b if b.is_ascii_whitespace() => {
                        self.finish_literal()?;
                        if b == b'\n' {
                            self.state = ParseState::StartLine;
                        }
                    }

                    b @ b'0'..=b'9' => self.buffer.push(b as char),

                    b => return Err(DimacsParseError::UnexpectedCharacter(b as char)),
                },

                ParseState::NegativeLiteral => match byte {
                    b @ b'1'..=b'9' => {
                        self.buffer.push(b as char);
                        self.state = ParseState::Literal;
                    }

                    b => return Err(DimacsParseError::UnexpectedCharacter(b as char)),
                },

                ParseState::Clause => match byte {
                    b'0' => self.finish_clause()?,

                    // A new-line does not terminate the clause; the literals parsed so far are
                    // kept while comments and leading whitespace on the next line are handled.
                    b'\n' => self.state = ParseState::StartLine,
                    b if b.is_ascii_whitespace() => {}

                    b @ b'1'..=b'9' => self.start_literal(b, true),
                    b'-' => self.start_literal(b'-', false),

                    b => return Err(DimacsParseError::UnexpectedCharacter(b as char)),
                },
            }
        }

        Ok(())
    }

    fn start_literal(&mut self, byte: u8, is_positive: bool) {
        self.state = if is_positive {
            ParseState::Literal
        } else {
            ParseState::NegativeLiteral
        };

        self.buffer.clear();
        self.buffer.push(byte as char);
    }

    fn complete(mut self) -> Result<Sink::Formula, DimacsParseError> {
        match self.state {
            ParseState::Header => self.init_formula()?,
            ParseState::Literal | ParseState::NegativeLiteral => {
                return Err(DimacsParseError::UnterminatedClause)
            }
            _ => {}
        }

        let (Some(sink), Some(header)) = (self.sink, self.header) else {
            return Err(DimacsParseError::MissingHeader);
        };

        if !self.clause.is_empty() {
            Err(DimacsParseError::UnterminatedClause)
        } else if header.num_clauses != self.parsed_clauses {
            Err(DimacsParseError::IncorrectClauseCount {
                expected: header.num_clauses,
                parsed: self.parsed_clauses,
            })
        } else {
            Ok(sink.into_formula())
        }
    }

    fn init_formula(&mut self) -> Result<(), DimacsParseError> {
        let header = self.buffer.trim().parse::<CnfHeader>()?;

        self.sink = Some(Sink::empty(
            self.sink_constructor_args
                .take()
                .ok_or(DimacsParseError::DuplicateHeader)?,
            header.num_variables,
        ));
        self.header = Some(header);

        Ok(())
    }

    fn finish_literal(&mut self) -> Result<(), DimacsParseError> {
        let invalid_literal = || DimacsParseError::InvalidLiteral(self.buffer.clone());

        let literal = self
            .buffer
            .parse::<i32>()
            .ok()
            .and_then(NonZeroI32::new)
            .ok_or_else(invalid_literal)?;

        // Literals over variables which are not declared in the header are rejected.
        if let Some(header) = &self.header {
            if literal.unsigned_abs().get() as usize > header.num_variables {
                return Err(invalid_literal());
            }
        }

        self.clause.push(literal);
        self.state = ParseState::Clause;

        Ok(())
    }

    fn finish_clause(&mut self) -> Result<(), DimacsParseError> {
        let sink = self.sink.as_mut().ok_or(DimacsParseError::MissingHeader)?;

        self.parsed_clauses += 1;
        sink.add_clause(&self.clause);
        self.clause.clear();
        self.state = ParseState::Clause;

        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct CnfHeader {
    num_variables: usize,
    num_clauses: usize,
}

impl FromStr for CnfHeader {
    type Err = DimacsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("p cnf ") {
            return Err(DimacsParseError::InvalidHeader(s.to_owned()));
        }

        let mut components = s.split_whitespace().skip(2);

        let num_variables = next_header_component::<usize>(&mut components, s)?;
        let num_clauses = next_header_component::<usize>(&mut components, s)?;

        if components.next().is_some() {
            return Err(DimacsParseError::InvalidHeader(s.to_owned()));
        }

        Ok(Self {
            num_variables,
            num_clauses,
        })
    }
}

fn next_header_component<'a, Num: FromStr>(
    components: &mut impl Iterator<Item = &'a str>,
    header: &str,
) -> Result<Num, DimacsParseError> {
    components
        .next()
        .ok_or_else(|| DimacsParseError::InvalidHeader(header.to_owned()))?
        .parse::<Num>()
        .map_err(|_| DimacsParseError::InvalidHeader(header.to_owned()))
}

/// A dimacs sink that creates a fresh [`SatisfactionSolver`] when reading DIMACS files. Every
/// clause is tagged with its position in the file.
#[derive(Debug)]
pub(crate) struct SolverDimacsSink {
    solver: SatisfactionSolver,
    num_clauses: usize,
}

impl DimacsSink for SolverDimacsSink {
    type ConstructorArgs = SatisfactionSolverOptions;
    type Formula = SatisfactionSolver;

    fn empty(options: Self::ConstructorArgs, num_variables: usize) -> Self {
        let mut solver = SatisfactionSolver::new(options);
        for id in 1..=num_variables {
            solver.register_variable(PropositionalVariable::new(id as u32));
        }

        SolverDimacsSink {
            solver,
            num_clauses: 0,
        }
    }

    fn add_clause(&mut self, clause: &[NonZeroI32]) {
        self.num_clauses += 1;
        let provenance = Provenance::from(format!("input clause #{}", self.num_clauses));

        let literals = clause.iter().map(|&dimacs_code| Literal::from(dimacs_code));
        if let Err(error) = self
            .solver
            .add_clause_with_provenance(literals, Some(provenance))
        {
            debug!("Input clause #{}: {error}", self.num_clauses);
        }
    }

    fn into_formula(self) -> Self::Formula {
        self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_instance_is_read() {
        let source = "p cnf 2 2\n1 -2 0\n-1 2 0";
        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], formula);
    }

    #[test]
    fn instance_with_two_character_codes_is_accepted() {
        let source = "p cnf 11 2\n1 -2 10 0\n-1 2 -11 0";
        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![1, -2, 10], vec![-1, 2, -11]], formula);
    }

    #[test]
    fn comments_are_ignored() {
        let source = "c this is\nc a comment\np cnf 2 2\n1 -2 0\nc within the file\n-1 2 0\n";
        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], formula);
    }

    #[test]
    fn whitespace_and_empty_lines_are_ignored() {
        let source = r#"

            p cnf 2 2

             1 -2 0

            -1  2 0
        "#;

        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], formula);
    }

    #[test]
    fn clauses_on_same_line_are_separated() {
        let source = "p cnf 2 2\n1 -2 0 -1 2 0";
        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], formula);
    }

    #[test]
    fn new_lines_do_not_terminate_clause() {
        let source = "p cnf 2 2\n1\n-2 0 -1 2\n 0";
        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![1, -2], vec![-1, 2]], formula);
    }

    #[test]
    fn empty_clause_is_parsed() {
        let source = "p cnf 1 2\n0\n1 0\n";
        let formula = parse_cnf_source(source);

        assert_eq!(vec![vec![], vec![1]], formula);
    }

    #[test]
    fn header_without_trailing_new_line_is_accepted() {
        let formula = parse_cnf_source("p cnf 3 0");

        assert!(formula.is_empty());
    }

    #[test]
    fn negative_zero_is_an_unexpected_sequence() {
        let err = get_cnf_parse_error("p cnf 2 1\n1 -2 -0");

        assert!(matches!(err, DimacsParseError::UnexpectedCharacter('0')));
    }

    #[test]
    fn incomplete_clause_causes_error() {
        let err = get_cnf_parse_error("p cnf 2 1\n1 -2");

        assert!(matches!(err, DimacsParseError::UnterminatedClause));
    }

    #[test]
    fn incorrect_reported_clause_count() {
        let err = get_cnf_parse_error("p cnf 2 2\n1 -2 0");

        assert!(matches!(
            err,
            DimacsParseError::IncorrectClauseCount {
                expected: 2,
                parsed: 1
            }
        ));
    }

    #[test]
    fn clause_before_header_is_rejected() {
        let err = get_cnf_parse_error("1 -2 0\np cnf 2 1\n");

        assert!(matches!(err, DimacsParseError::MissingHeader));
    }

    #[test]
    fn second_header_is_rejected() {
        let err = get_cnf_parse_error("p cnf 2 1\np cnf 2 1\n1 0\n");

        assert!(matches!(err, DimacsParseError::DuplicateHeader));
    }

    #[test]
    fn malformed_header_is_rejected() {
        let err = get_cnf_parse_error("p cnf two 1\n1 0\n");
        assert!(matches!(err, DimacsParseError::InvalidHeader(_)));

        let err = get_cnf_parse_error("p wcnf 2 1 3\n1 0\n");
        assert!(matches!(err, DimacsParseError::InvalidHeader(_)));
    }

    #[test]
    fn undeclared_variable_is_an_invalid_literal() {
        let err = get_cnf_parse_error("p cnf 2 1\n1 3 0\n");

        assert!(matches!(err, DimacsParseError::InvalidLiteral(literal) if literal == "3"));
    }

    #[test]
    fn unexpected_character_is_rejected() {
        let err = get_cnf_parse_error("p cnf 2 1\n1 x 0\n");

        assert!(matches!(err, DimacsParseError::UnexpectedCharacter('x')));
    }

    #[test]
    fn solver_sink_registers_all_declared_variables() {
        let solver = parse_cnf::<SolverDimacsSink>(
            "p cnf 4 1\n1 -2 0\n".as_bytes(),
            SatisfactionSolverOptions::default(),
        )
        .expect("valid dimacs");

        assert_eq!(solver.num_variables(), 4);
    }

    fn parse_cnf_source(source: &str) -> Vec<Vec<i32>> {
        parse_cnf::<Vec<Vec<i32>>>(source.as_bytes(), ()).expect("valid dimacs")
    }

    fn get_cnf_parse_error(source: &str) -> DimacsParseError {
        parse_cnf::<Vec<Vec<i32>>>(source.as_bytes(), ()).expect_err("invalid dimacs")
    }

    impl DimacsSink for Vec<Vec<i32>> {
        type ConstructorArgs = ();

        type Formula = Vec<Vec<i32>>;

        fn empty(_: Self::ConstructorArgs, _: usize) -> Self {
            vec![]
        }

        fn add_clause(&mut self, clause: &[NonZeroI32]) {
            self.push(clause.iter().map(|lit| lit.get()).collect());
        }

        fn into_formula(self) -> Self::Formula {
            self
        }
    }
}
