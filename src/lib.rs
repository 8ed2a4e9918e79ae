//! Finds every combination of dictionary words that spells the letters of a
//! given text, optionally forcing a phrase into every result.

pub mod anagrammer;
pub mod combinations;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod normalize;
pub mod progress;
pub mod search;
pub mod signature;

pub use crate::anagrammer::{Anagrammer, RunSummary};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{ConfigError, Error, LoadError, Result};
pub use crate::signature::Signature;
