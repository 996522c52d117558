use bstr::ByteSlice;
use thiserror::Error;

pub type FieldResult<T> = Result<T, ParseFieldError>;
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFieldError {
    /// A bytestring couldn't be parsed as a string, can happen when
    /// the contents aren't UTF8.
    #[error("Failed to parse a bytestring as a UTF-8 string")]
    Utf8Error,
    /// Attempted to parse an orientation that wasn't + or -.
    #[error("Failed to parse an orientation character")]
    OrientationError,
    /// A required field was incorrectly formatted. Includes the field
    /// name from the record schema.
    #[error("Failed to parse field `{0}`")]
    InvalidField(&'static str),
    /// A field expected to be a `TAG:TYPE:VALUE` tag was missing one
    /// of its colons.
    #[error("Field `{0}` is not a TAG:TYPE:VALUE tag")]
    InvalidTag(&'static str),
    #[error("Line has {found} fields, {expected} are required")]
    MissingFields { expected: usize, found: usize },
    /// A fixed-width table row had more fields than its header.
    #[error("Line has {found} fields, expected {expected}")]
    ExtraFields { expected: usize, found: usize },
}

macro_rules! impl_many_from {
    ($to:ty, ($from:ty, $out:expr)) => (
        impl From<$from> for $to {
            fn from(_: $from) -> Self {
                $out
            }
        }
    );
    ($to:ty, ($from:ty, $out:expr), $(($f:ty, $o:expr)),* $(,)?) => (
        impl_many_from!($to, ($from, $out));
        impl_many_from!($to, $(($f, $o)),*);
    );
}

impl_many_from!(
    ParseFieldError,
    (std::str::Utf8Error, ParseFieldError::Utf8Error),
    (bstr::Utf8Error, ParseFieldError::Utf8Error),
);

/// Line-level parse failures. Every one of these aborts the run; no
/// line is ever skipped, since a skipped line would silently change
/// the coverage of some node.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A line didn't match its record schema. Includes the 1-based
    /// line number, the problem line and the field error.
    #[error("Failed to parse line {line} `{text}`: {source}")]
    MalformedRecord {
        line: usize,
        text: String,
        source: ParseFieldError,
    },
    /// The coverage tag of a segment line was present but empty.
    #[error(
        "Line {line} has an empty coverage tag; the GAF file does not \
         contain the dc tag. Rerun minigraph with --cov to generate it"
    )]
    MissingCoverageTag { line: usize },
    /// Wrapper for an IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    #[inline]
    pub(crate) fn malformed(
        line: usize,
        text: &[u8],
        source: ParseFieldError,
    ) -> Self {
        let mut dest = String::new();
        text.to_str_lossy_into(&mut dest);
        Self::MalformedRecord {
            line,
            text: dest,
            source,
        }
    }

    /// The 1-based line number the error occurred on, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedRecord { line, .. } => Some(*line),
            Self::MissingCoverageTag { line } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
