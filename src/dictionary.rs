//! The word list, grouped by word length and then by signature.
//!
//! Only words that could take part in an anagram of the target are kept, so
//! the index for a short phrase stays small even with a large word list.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::normalize::normalize_bytes;
use crate::signature::Signature;

/// Hard upper bound on the normalized length of a dictionary word.
pub const MAX_WORD_LENGTH: usize = 60;

/// What to do with a word longer than [`MAX_WORD_LENGTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongWordPolicy {
    /// Count it as filtered and keep loading.
    #[default]
    Skip,
    /// Abort the load with [`LoadError::WordTooLong`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub long_words: LongWordPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            min_word_length: 1,
            max_word_length: MAX_WORD_LENGTH,
            long_words: LongWordPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines in the word list, including blank ones.
    pub lines: usize,
    /// Lines that normalized to a non-empty word.
    pub words: usize,
    /// Words outside the allowed length range.
    pub filtered: usize,
    /// Words kept in the index.
    pub retained: usize,
    /// Length of the longest kept word.
    pub longest: usize,
}

/// All surface forms sharing one signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub signature: Signature,
    pub words: Vec<String>,
}

#[derive(Debug, Default)]
struct Section {
    entries: Vec<Entry>,
    by_signature: HashMap<Signature, usize>,
}

impl Section {
    fn insert(&mut self, signature: Signature, word: String) {
        match self.by_signature.get(&signature) {
            Some(&i) => {
                let words = &mut self.entries[i].words;
                if !words.contains(&word) {
                    words.push(word);
                }
            }
            None => {
                self.by_signature.insert(signature, self.entries.len());
                self.entries.push(Entry {
                    signature,
                    words: vec![word],
                });
            }
        }
    }
}

#[derive(Debug)]
pub struct DictionaryIndex {
    /// `sections[n]` holds the words of `n` letters.
    sections: Vec<Section>,
    stats: LoadStats,
}

impl DictionaryIndex {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        target: &Signature,
        options: &LoadOptions,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), target, options).map_err(|e| match e {
            LoadError::Io { source, .. } => LoadError::Io {
                path: path.to_owned(),
                source,
            },
            other => other,
        })
    }

    /// Reads one word per line from `reader`, keeping only words whose
    /// signature is a subset of `target`.
    pub fn from_reader<R: BufRead>(
        mut reader: R,
        target: &Signature,
        options: &LoadOptions,
    ) -> Result<Self, LoadError> {
        let mut index = DictionaryIndex {
            sections: (0..=MAX_WORD_LENGTH).map(|_| Section::default()).collect(),
            stats: LoadStats::default(),
        };

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|source| LoadError::Io {
                path: Default::default(),
                source,
            })?;
            if read == 0 {
                break;
            }
            index.stats.lines += 1;
            let line = index.stats.lines;

            let plain = normalize_bytes(&buf)
                .map_err(|source| LoadError::Normalization { line, source })?;
            if plain.is_empty() {
                continue;
            }
            index.stats.words += 1;

            let surface = String::from_utf8_lossy(&buf).trim().to_owned();
            let length = plain.len();
            if length > MAX_WORD_LENGTH && options.long_words == LongWordPolicy::Reject {
                return Err(LoadError::WordTooLong {
                    line,
                    word: surface,
                    max: MAX_WORD_LENGTH,
                });
            }
            if length < options.min_word_length || length > options.max_word_length.min(MAX_WORD_LENGTH) {
                debug!(line, word = %surface, length, "filtered dictionary word");
                index.stats.filtered += 1;
                continue;
            }

            let signature = Signature::from_text(&plain);
            if !signature.is_subset_of(target) {
                continue;
            }

            index.stats.retained += 1;
            index.stats.longest = index.stats.longest.max(length);
            index.sections[length].insert(signature, surface);
        }

        Ok(index)
    }

    /// Builds an index from in-memory words, mostly for tests.
    pub fn from_words<I, S>(words: I, target: &Signature, options: &LoadOptions) -> Result<Self, LoadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = String::new();
        for word in words {
            list.push_str(word.as_ref());
            list.push('\n');
        }
        Self::from_reader(io::Cursor::new(list), target, options)
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Entries whose words have exactly `length` letters.
    pub fn section(&self, length: usize) -> &[Entry] {
        self.sections
            .get(length)
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Surface forms of the words with the given signature.
    pub fn words_for(&self, signature: &Signature) -> &[String] {
        self.sections
            .get(signature.char_count())
            .and_then(|s| s.by_signature.get(signature).map(|&i| s.entries[i].words.as_slice()))
            .unwrap_or(&[])
    }

    /// Sorted word lengths that have at least one entry.
    pub fn available_lengths(&self) -> Vec<usize> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.entries.is_empty())
            .map(|(length, _)| length)
            .collect()
    }
}

impl fmt::Display for DictionaryIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            for entry in &section.entries {
                write!(f, "{}", entry.signature)?;
                for word in &entry.words {
                    write!(f, " {}", word)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
