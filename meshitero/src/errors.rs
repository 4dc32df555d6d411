//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = MeshiteroError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum MeshiteroError {
    InvalidArgument(InvalidArgumentError),
    InvalidCorpus(InvalidCorpusError),
    MalformedAnalysis(MalformedAnalysisError),
    Tokenizer(TokenizerError),
    IOError(std::io::Error),
}

impl MeshiteroError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_corpus<S>(category: &str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidCorpus(InvalidCorpusError {
            category: category.to_string(),
            msg: msg.into(),
        })
    }

    pub(crate) fn malformed_analysis<S>(line: S) -> Self
    where
        S: Into<String>,
    {
        Self::MalformedAnalysis(MalformedAnalysisError { line: line.into() })
    }

    pub(crate) fn tokenizer<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Tokenizer(TokenizerError { msg: msg.into() })
    }
}

impl fmt::Display for MeshiteroError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidCorpus(e) => e.fmt(f),
            Self::MalformedAnalysis(e) => e.fmt(f),
            Self::Tokenizer(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for MeshiteroError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IOError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a category cannot be trained on its corpus.
#[derive(Debug)]
pub struct InvalidCorpusError {
    /// Name of the category.
    pub(crate) category: String,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidCorpusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidCorpusError: {}: {}", self.category, self.msg)
    }
}

impl Error for InvalidCorpusError {}

/// Error used when the analyzer emits a record that is not `surface\tfeatures`.
#[derive(Debug)]
pub struct MalformedAnalysisError {
    /// The offending output line.
    pub(crate) line: String,
}

impl fmt::Display for MalformedAnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MalformedAnalysisError: {:?}", self.line)
    }
}

impl Error for MalformedAnalysisError {}

/// Error reported by an external tokenizer backend.
#[derive(Debug)]
pub struct TokenizerError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TokenizerError: {}", self.msg)
    }
}

impl Error for TokenizerError {}

impl From<std::io::Error> for MeshiteroError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
