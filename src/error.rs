//! Error types for the tallysheet command line

use thiserror::Error;

/// Problems with the command line itself.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("--command and --output cannot be combined")]
    ConflictingModes,
}
