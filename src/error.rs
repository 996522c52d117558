use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run. None of these are retried; they
/// are deterministic problems with the input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Input file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    /// A line of an input file failed to parse.
    #[error("Error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: ParseError,
    },

    #[error("Node `{node}` occurs more than once in {origin}")]
    DuplicateNode { node: String, origin: String },

    /// A node of the presence matrix has no entry in the node length
    /// table, so its length can't be counted.
    #[error("Node `{0}` is missing from the node length table")]
    DanglingNode(String),

    #[error("{what} has {found} columns, expected {expected}")]
    ColumnMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse<P: Into<PathBuf>>(path: P, source: ParseError) -> Self {
        Error::Parse {
            path: path.into(),
            source,
        }
    }
}
