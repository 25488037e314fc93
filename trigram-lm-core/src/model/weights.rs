use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SUM_TOLERANCE: f64 = 1e-9;

/// Linear interpolation weights for the smoothed trigram probability.
///
/// `P(w3 | w1, w2) = trigram * P_raw(w3 | w1, w2) + bigram * P_raw(w3 | w2) + unigram * P_raw(w3)`
///
/// # Invariants
/// - Every weight is in `[0, 1]` and the three sum to 1
/// - `unigram > 0`, the unigram term being the only one that is never zero
///   for a lexicon token
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SmoothingWeights {
	trigram: f64,
	bigram: f64,
	unigram: f64,
}

impl Default for SmoothingWeights {
	/// Equal thirds.
	fn default() -> Self {
		Self { trigram: 1.0 / 3.0, bigram: 1.0 / 3.0, unigram: 1.0 / 3.0 }
	}
}

impl SmoothingWeights {
	/// Creates weights that already sum to 1.
	///
	/// # Errors
	/// Returns `InvalidArgument` if a weight is outside `[0, 1]`, if the sum
	/// differs from 1, or if the unigram weight is zero.
	pub fn new(trigram: f64, bigram: f64, unigram: f64) -> Result<Self> {
		for (name, weight) in [("trigram", trigram), ("bigram", bigram), ("unigram", unigram)] {
			if !(0.0..=1.0).contains(&weight) {
				return Err(Error::InvalidArgument(format!(
					"{name} weight must be between 0.0 and 1.0, got {weight}"
				)));
			}
		}
		let sum = trigram + bigram + unigram;
		if (sum - 1.0).abs() > SUM_TOLERANCE {
			return Err(Error::InvalidArgument(format!("weights must sum to 1.0, got {sum}")));
		}
		if unigram == 0.0 {
			return Err(Error::InvalidArgument("unigram weight must be positive".to_owned()));
		}
		Ok(Self { trigram, bigram, unigram })
	}

	/// Creates weights from unnormalized intensities.
	///
	/// - If the total is > 0, weights are proportional to the intensities.
	/// - If all intensities are 0, the default equal thirds are returned.
	///
	/// # Errors
	/// Returns `InvalidArgument` for a negative or non-finite intensity, or
	/// when the resulting weights are invalid (zero unigram intensity).
	pub fn normalized(trigram: f64, bigram: f64, unigram: f64) -> Result<Self> {
		let intensities = [trigram, bigram, unigram];
		if intensities.iter().any(|i| !i.is_finite() || *i < 0.0) {
			return Err(Error::InvalidArgument("intensities must be finite and non-negative".to_owned()));
		}

		let sum: f64 = intensities.iter().sum();
		if sum == 0.0 {
			return Ok(Self::default());
		}
		Self::new(trigram / sum, bigram / sum, 1.0 - trigram / sum - bigram / sum)
	}

	pub fn trigram(&self) -> f64 {
		self.trigram
	}

	pub fn bigram(&self) -> f64 {
		self.bigram
	}

	pub fn unigram(&self) -> f64 {
		self.unigram
	}
}
