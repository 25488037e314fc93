use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building or querying a model.
#[derive(Error, Debug)]
pub enum Error {
	/// A caller supplied an argument outside its domain (n < 1, bad weights).
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// The corpus or snapshot could not be read or written.
	#[error("stream error: {0}")]
	Stream(#[from] std::io::Error),

	/// A smoothed probability was not strictly positive.
	///
	/// Only reachable when a token outside the lexicon reaches the estimator.
	#[error("log2 of non-positive probability {probability} for trigram ({trigram})")]
	MathDomain { trigram: String, probability: f64 },

	/// The corpus produced no sentence.
	#[error("corpus contains no sentence")]
	EmptyCorpus,

	#[error("snapshot error: {0}")]
	Serialization(#[from] postcard::Error),

	#[error("model {0} not found")]
	ModelNotFound(String),
}
