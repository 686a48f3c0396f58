//! Errors of the command-line front end.

use std::io;
use std::path::PathBuf;

use konview_core::KonviewError;
use konview_utils::LoggingError;
use thiserror::Error;

/// Everything that can stop a `konview` invocation
#[derive(Error, Debug)]
pub enum CliError
{
    /// The transcript file could not be read
    #[error("Failed to read transcript {path}: {source}")]
    TranscriptIo
    {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// A transcript line did not follow the record grammar
    #[error("Transcript line {line}: {reason}")]
    TranscriptParse
    {
        /// 1-based line number
        line: usize,
        /// What did not parse
        reason: String,
    },

    /// The transcript records no variable with this name
    #[error("No variable named `{0}` in the transcript")]
    UnknownVariable(String),

    /// Logging could not be set up
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// The engine failed while decoding
    #[error(transparent)]
    Engine(#[from] KonviewError),
}

/// Result alias for the front end
pub type CliResult<T> = std::result::Result<T, CliError>;
