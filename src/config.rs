//! Validated run configuration.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::dictionary::{LoadOptions, LongWordPolicy, MAX_WORD_LENGTH};
use crate::error::{ConfigError, Result};
use crate::normalize::{count_words, normalize};
use crate::signature::Signature;

pub const DEFAULT_OUTPUT: &str = "anagrams.txt";
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Letter budgets derived from the source and included texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub source: Signature,
    pub included: Signature,
    /// `source - included`: what the dictionary words must spell.
    pub actual: Signature,
    pub included_words: usize,
    /// Cardinality bounds for dictionary words alone.
    pub min_words: usize,
    pub max_words: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    source_text: String,
    dictionary: PathBuf,
    included_text: String,
    min_cardinality: usize,
    max_cardinality: usize,
    threads: usize,
    output: PathBuf,
    load: LoadOptions,
    progress_interval: Duration,
    target: Target,
}

impl Config {
    pub fn builder<S: Into<String>, P: Into<PathBuf>>(source_text: S, dictionary: P) -> ConfigBuilder {
        ConfigBuilder::new(source_text, dictionary)
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn dictionary(&self) -> &Path {
        &self.dictionary
    }

    /// The included phrase with its whitespace collapsed, or `None`.
    pub fn included_text(&self) -> Option<&str> {
        if self.included_text.is_empty() {
            None
        } else {
            Some(&self.included_text)
        }
    }

    pub fn cardinality(&self) -> (usize, usize) {
        (self.min_cardinality, self.max_cardinality)
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// One thread is kept for the writer.
    pub fn workers(&self) -> usize {
        self.threads.saturating_sub(1).max(1)
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn load_options(&self) -> &LoadOptions {
        &self.load
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    source_text: String,
    dictionary: PathBuf,
    included_text: String,
    min_cardinality: usize,
    max_cardinality: usize,
    threads: Option<usize>,
    output: PathBuf,
    load: LoadOptions,
    progress_interval: Duration,
}

impl ConfigBuilder {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(source_text: S, dictionary: P) -> Self {
        ConfigBuilder {
            source_text: source_text.into(),
            dictionary: dictionary.into(),
            included_text: String::new(),
            min_cardinality: 1,
            max_cardinality: 1,
            threads: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            load: LoadOptions::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn included<S: Into<String>>(mut self, text: S) -> Self {
        self.included_text = text.into();
        self
    }

    pub fn cardinality(mut self, min: usize, max: usize) -> Self {
        self.min_cardinality = min;
        self.max_cardinality = max;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = path.into();
        self
    }

    pub fn word_length(mut self, min: usize, max: usize) -> Self {
        self.load.min_word_length = min;
        self.load.max_word_length = max;
        self
    }

    pub fn long_words(mut self, policy: LongWordPolicy) -> Self {
        self.load.long_words = policy;
        self
    }

    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Validates the configuration, failing on the first broken rule.
    pub fn build(self) -> Result<Config> {
        let source = Signature::from_text(&normalize(&self.source_text)?);
        if source.is_empty() {
            return Err(ConfigError::EmptySource.into());
        }

        let included_text = self.included_text.split_whitespace().collect::<Vec<_>>().join(" ");
        let included = Signature::from_text(&normalize(&included_text)?);
        let actual = source
            .subtract(&included)
            .map_err(|_| ConfigError::IncludedNotSubset)?;
        if actual.is_empty() {
            return Err(ConfigError::IncludedIsFullAnagram.into());
        }
        // An included phrase made only of punctuation adds no word
        let included_words = if included.is_empty() { 0 } else { count_words(&included_text) };

        let (min, max) = (self.min_cardinality, self.max_cardinality);
        if min == 0 || max == 0 {
            return Err(ConfigError::NonPositiveCardinality.into());
        }
        if min > max {
            return Err(ConfigError::CardinalityOrder { min, max }.into());
        }
        if min <= included_words {
            return Err(ConfigError::CardinalityNotAboveIncluded {
                which: "minimum",
                value: min,
                included: included_words,
            }
            .into());
        }
        if max <= included_words {
            return Err(ConfigError::CardinalityNotAboveIncluded {
                which: "maximum",
                value: max,
                included: included_words,
            }
            .into());
        }

        let load = self.load;
        if load.min_word_length == 0
            || load.min_word_length > load.max_word_length
            || load.max_word_length > MAX_WORD_LENGTH
        {
            return Err(ConfigError::WordLengthBounds {
                min: load.min_word_length,
                max: load.max_word_length,
                limit: MAX_WORD_LENGTH,
            }
            .into());
        }

        let threads = match self.threads {
            Some(0) => return Err(ConfigError::NoThreads.into()),
            Some(n) => n,
            None => thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1),
        };

        Ok(Config {
            source_text: self.source_text,
            dictionary: self.dictionary,
            included_text: if included_words == 0 { String::new() } else { included_text },
            min_cardinality: min,
            max_cardinality: max,
            threads,
            output: self.output,
            load,
            progress_interval: self.progress_interval,
            target: Target {
                source,
                included,
                actual,
                included_words,
                min_words: min - included_words,
                max_words: max - included_words,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::normalize::NormalizationError;

    fn builder(text: &str) -> ConfigBuilder {
        Config::builder(text, "words.txt")
    }

    fn config_error(result: Result<Config>) -> ConfigError {
        match result {
            Err(Error::Config(e)) => e,
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn defaults() {
        let config = builder("Uncle Pear").build().unwrap();
        assert_eq!(config.output(), Path::new(DEFAULT_OUTPUT));
        assert_eq!(config.cardinality(), (1, 1));
        assert!(config.threads() >= 1);
        assert!(config.workers() >= 1);
        assert_eq!(config.included_text(), None);
        assert_eq!(config.load_options(), &LoadOptions::default());

        let target = config.target();
        assert_eq!(target.source, Signature::from_text("unclepear"));
        assert_eq!(target.actual, target.source);
        assert!(target.included.is_empty());
        assert_eq!((target.min_words, target.max_words), (1, 1));
    }

    #[test]
    fn included_text_reduces_target() {
        let config = builder("stream").included("  art ").cardinality(2, 3).build().unwrap();
        let target = config.target();
        assert_eq!(config.included_text(), Some("art"));
        assert_eq!(target.actual, Signature::from_text("mes"));
        assert_eq!(target.included_words, 1);
        assert_eq!((target.min_words, target.max_words), (1, 2));
    }

    #[test]
    fn multi_word_included_text() {
        let config = builder("uncle pear").included("pea  run").cardinality(3, 4).build().unwrap();
        assert_eq!(config.included_text(), Some("pea run"));
        assert_eq!(config.target().included_words, 2);
        assert_eq!(config.target().actual, Signature::from_text("cle"));
    }

    #[test]
    fn rejects_bad_included_text() {
        let err = config_error(builder("stream").included("tart").cardinality(2, 2).build());
        assert_eq!(err, ConfigError::IncludedNotSubset);

        let err = config_error(builder("stream").included("master").cardinality(2, 2).build());
        assert_eq!(err, ConfigError::IncludedIsFullAnagram);
    }

    #[test]
    fn rejects_bad_cardinalities() {
        assert_eq!(
            config_error(builder("eat").cardinality(0, 2).build()),
            ConfigError::NonPositiveCardinality
        );
        assert_eq!(
            config_error(builder("eat").cardinality(3, 2).build()),
            ConfigError::CardinalityOrder { min: 3, max: 2 }
        );
        assert_eq!(
            config_error(builder("stream").included("art").cardinality(1, 2).build()),
            ConfigError::CardinalityNotAboveIncluded { which: "minimum", value: 1, included: 1 }
        );
    }

    #[test]
    fn rejects_empty_source_and_zero_threads() {
        assert_eq!(config_error(builder("?!").build()), ConfigError::EmptySource);
        assert_eq!(config_error(builder("eat").threads(0).build()), ConfigError::NoThreads);
    }

    #[test]
    fn rejects_bad_word_lengths() {
        assert!(matches!(
            config_error(builder("eat").word_length(3, 2).build()),
            ConfigError::WordLengthBounds { min: 3, max: 2, .. }
        ));
        assert!(matches!(
            config_error(builder("eat").word_length(1, MAX_WORD_LENGTH + 1).build()),
            ConfigError::WordLengthBounds { .. }
        ));
    }

    #[test]
    fn surfaces_normalization_errors() {
        let result = builder("日本").build();
        assert!(matches!(
            result,
            Err(Error::Normalization(NormalizationError::Unmappable { ch: '日', .. }))
        ));
    }

    #[test]
    fn single_worker_minimum() {
        let config = builder("eat").threads(1).build().unwrap();
        assert_eq!(config.workers(), 1);
        let config = builder("eat").threads(8).build().unwrap();
        assert_eq!(config.workers(), 7);
    }
}
