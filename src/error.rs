use std::io;
use std::path::PathBuf;

use crate::normalize::NormalizationError;

/// Invalid run configuration, reported before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("the source text contains no letters")]
    EmptySource,

    #[error("cardinalities must be positive")]
    NonPositiveCardinality,

    #[error("maximum cardinality ({max}) must be greater or equal to minimum cardinality ({min})")]
    CardinalityOrder { min: usize, max: usize },

    #[error("{which} cardinality ({value}) must be greater than the number of included words ({included})")]
    CardinalityNotAboveIncluded {
        which: &'static str,
        value: usize,
        included: usize,
    },

    #[error("the included text must be a subset of the source text")]
    IncludedNotSubset,

    #[error("the included text is already an anagram of the source text")]
    IncludedIsFullAnagram,

    #[error("word length bounds {min}..={max} are invalid, lengths must lie within 1..={limit}")]
    WordLengthBounds { min: usize, max: usize, limit: usize },

    #[error("thread count must be positive")]
    NoThreads,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read dictionary {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("dictionary line {line}: {source}")]
    Normalization {
        line: usize,
        #[source]
        source: NormalizationError,
    },

    #[error("dictionary line {line}: word {word:?} is too long, maximum length is {max}")]
    WordTooLong { line: usize, word: String, max: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot open output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write anagrams: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
