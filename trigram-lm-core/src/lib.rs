//! Trigram statistical language model library.
//!
//! This crate builds a word-level trigram model from a sentence-per-line
//! corpus and scores unseen text by perplexity. It provides:
//! - Corpus reading with lowercase normalization and `UNK` substitution
//! - Closed vocabulary (lexicon) construction
//! - Unigram / bigram / trigram counting
//! - Raw and linearly interpolated probability estimation
//! - Sentence log-probability and corpus perplexity
//! - Compact model snapshots and multi-model ranking
//!
//! Construction reads the training source twice (lexicon pass, counting
//! pass). Once built, a model is read-only.

/// Crate error type.
pub mod error;

/// Restartable corpus sources and the sentence tokenizer.
pub mod corpus;

/// Lexicon, n-gram extraction, counting and the trigram model itself.
pub mod model;

/// I/O utilities (path helpers, directory listing).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
