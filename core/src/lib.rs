//! Exhaustive salted-hash table generation and lookup.
//!
//! The crate enumerates every candidate string over a configurable alphabet
//! and length range, hashes each one with a prepended salt on a pool of
//! worker threads, and either persists the resulting digest table or stops
//! at the first candidate matching a target digest. A benchmark entry point
//! measures the sustained hashing rate of the same pipeline.

mod benchmark;
mod charset;
mod combinations;
mod error;
mod event;
mod generator;
mod hash;
mod writer;

pub use benchmark::BenchmarkReport;
pub use charset::{
    Charset, CharsetBuilder, DEFAULT_BASE_CHARSET, DEFAULT_DIGITS_CHARSET,
    DEFAULT_SPECIAL_CHARSET, DEFAULT_UPPERCASE_CHARSET,
};
pub use combinations::{total_combinations, CombinationEnumerator};
pub use error::{BruteError, BruteResult};
pub use event::{Event, TableHandle};
pub use generator::{Generator, RunSummary, SearchHit, TableRequest};
pub use hash::{HashAlgorithm, HashEngine};
pub use writer::{write_table, OutputFormat};

use num_bigint::BigUint;

/// All the parameters of one candidate space.
///
/// Built via [`TableCtxBuilder`], which guarantees the invariants the
/// pipeline relies on (non-empty ASCII charset, sane length range, at least
/// one worker).
#[derive(Clone, Debug)]
pub struct TableCtx {
    pub algorithm: HashAlgorithm,
    pub salt: Vec<u8>,
    pub min_length: usize,
    pub max_length: usize,
    pub threads: usize,
    pub charset: Charset,
}

impl TableCtx {
    /// The number of candidates in the space, in closed form.
    pub fn total_combinations(&self) -> BigUint {
        combinations::total_combinations(self.charset.len(), self.min_length, self.max_length)
    }

    /// A fresh enumerator over the whole space, in canonical order.
    pub fn enumerator(&self) -> CombinationEnumerator {
        CombinationEnumerator::new(self.charset.clone(), self.min_length, self.max_length)
    }
}

/// Builds a [`TableCtx`] with sensible defaults.
///
/// Defaults to SHA256 over lowercase letters, lengths 1 to 4, no salt, one
/// worker thread.
#[derive(Clone, Debug)]
pub struct TableCtxBuilder {
    algorithm: HashAlgorithm,
    salt: Vec<u8>,
    min_length: usize,
    max_length: usize,
    threads: usize,
    charset: CharsetBuilder,
}

impl Default for TableCtxBuilder {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            salt: Vec::new(),
            min_length: 1,
            max_length: 4,
            threads: 1,
            charset: CharsetBuilder::new(),
        }
    }
}

impl TableCtxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash function.
    pub fn hash(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;

        self
    }

    /// Sets the salt prepended to every candidate before hashing.
    pub fn salt(mut self, salt: &[u8]) -> Self {
        self.salt = salt.to_vec();

        self
    }

    /// Sets the candidate length range, inclusive on both ends.
    pub fn length_range(mut self, min: usize, max: usize) -> Self {
        self.min_length = min;
        self.max_length = max;

        self
    }

    /// Sets the worker thread count.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;

        self
    }

    /// Enables or disables the uppercase class.
    pub fn include_uppercase(mut self, include: bool) -> Self {
        self.charset = self.charset.include_uppercase(include);

        self
    }

    /// Enables or disables the digits class.
    pub fn include_digits(mut self, include: bool) -> Self {
        self.charset = self.charset.include_digits(include);

        self
    }

    /// Enables or disables the special symbols class.
    pub fn include_special(mut self, include: bool) -> Self {
        self.charset = self.charset.include_special(include);

        self
    }

    /// Overrides the base class.
    pub fn base_charset(mut self, charset: &[u8]) -> Self {
        self.charset = self.charset.base(charset);

        self
    }

    /// Overrides the uppercase class.
    pub fn uppercase_charset(mut self, charset: &[u8]) -> Self {
        self.charset = self.charset.uppercase(charset);

        self
    }

    /// Overrides the digits class.
    pub fn digits_charset(mut self, charset: &[u8]) -> Self {
        self.charset = self.charset.digits(charset);

        self
    }

    /// Overrides the special symbols class.
    pub fn special_charset(mut self, charset: &[u8]) -> Self {
        self.charset = self.charset.special(charset);

        self
    }

    /// Validates the parameters and builds the context.
    pub fn build(self) -> BruteResult<TableCtx> {
        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(BruteError::InvalidLengthRange {
                min: self.min_length,
                max: self.max_length,
            });
        }

        if self.threads == 0 {
            return Err(BruteError::InvalidThreadCount);
        }

        Ok(TableCtx {
            algorithm: self.algorithm,
            salt: self.salt,
            min_length: self.min_length,
            max_length: self.max_length,
            threads: self.threads,
            charset: self.charset.build()?,
        })
    }
}
