use std::fmt::Display;

use thiserror::Error;

use crate::parsers::dimacs::DimacsParseError;

pub(crate) type DepsatResult<T> = Result<T, DepsatError>;

#[derive(Error, Debug)]
pub(crate) enum DepsatError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The file {0} is not supported.")]
    InvalidInstanceFile(String),
    #[error("The dimacs file was invalid, more details: {0}")]
    InvalidDimacs(#[from] DimacsParseError),
}

impl DepsatError {
    pub(crate) fn invalid_instance(path: impl Display) -> Self {
        Self::InvalidInstanceFile(format!("{path}"))
    }
}
