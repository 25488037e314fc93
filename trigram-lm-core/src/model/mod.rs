//! Top-level module for the trigram language model.
//!
//! Construction pipeline, leaves first:
//! - Closed vocabulary with sentinel tokens (`Lexicon`)
//! - Padded n-gram extraction (`extract_ngrams`)
//! - Frequency tables built in a single counting pass (`NGramCounts`)
//! - Interpolation weights (`SmoothingWeights`)
//! - Probability estimation and perplexity (`TrigramModel`)
//! - Named model collections ranked by perplexity (`ModelSet`)

/// Closed vocabulary built from a corpus, plus the reserved sentinels.
pub mod lexicon;

/// Padded n-gram extraction shared by counting and scoring.
pub mod ngram;

/// Unigram, bigram and trigram frequency tables.
pub mod counts;

/// Linear interpolation weights.
pub mod weights;

/// The trigram model: estimation, log-probability and perplexity.
pub mod trigram_model;

/// Several named models scored against the same evaluation corpus.
pub mod model_set;
