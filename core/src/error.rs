use std::{io, path::PathBuf};

use thiserror::Error;

pub type BruteResult<T> = std::result::Result<T, BruteError>;

#[derive(Error, Debug)]
pub enum BruteError {
    #[error("The {0} character class is enabled but contains no characters")]
    EmptyClass(&'static str),

    #[error("The charset can only contain ASCII characters")]
    NonAsciiCharset,

    #[error("Invalid length range {min}..={max}: lengths must be at least 1 and min must not exceed max")]
    InvalidLengthRange { min: usize, max: usize },

    #[error("The number of threads must be at least 1")]
    InvalidThreadCount,

    #[error("The benchmark budget must be greater than zero")]
    InvalidBenchmarkBudget,

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("An output destination and a target digest cannot be set in the same run")]
    AmbiguousRequest,

    #[error("The output file {0} already exists. Request an overwrite to replace it")]
    OutputConflict(PathBuf),

    #[error("Unsupported output format: {0:?}. Use txt, csv or json")]
    UnsupportedOutputFormat(String),

    #[error("Another run is already in progress on this generator")]
    AlreadyRunning,

    #[error(
        "Unable to access the file at the given path. Make sure the right permissions are available"
    )]
    Io(#[from] io::Error),

    #[error("Failed to serialize the table")]
    Serialize,
}
