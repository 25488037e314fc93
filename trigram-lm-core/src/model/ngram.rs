use crate::error::{Error, Result};
use crate::model::lexicon::{START, STOP};

/// An ordered tuple of `n` tokens.
///
/// Equality and hashing are by value and order: `(a, b, c) != (c, b, a)`.
pub type NGram = Vec<String>;

/// Returns every contiguous `n`-token window of `sequence`, left to right.
///
/// For `n == 1` the sequence is used as is. For `n > 1` it is padded with
/// `n - 1` `START` tokens in front and one `STOP` token at the back, so a
/// sequence of length `L` yields `L + 1` windows. Windows made partly or
/// entirely of sentinels are included.
///
/// The same padding is used for counting and for scoring.
///
/// # Errors
/// Returns `InvalidArgument` if `n < 1`.
pub fn extract_ngrams<S: AsRef<str>>(sequence: &[S], n: usize) -> Result<Vec<NGram>> {
	if n < 1 {
		return Err(Error::InvalidArgument("n must be at least 1".to_owned()));
	}

	let mut padded: Vec<&str> = Vec::with_capacity(sequence.len() + n);
	if n > 1 {
		padded.extend(std::iter::repeat_n(START, n - 1));
	}
	padded.extend(sequence.iter().map(|token| token.as_ref()));
	if n > 1 {
		padded.push(STOP);
	}

	Ok(padded
		.windows(n)
		.map(|window| window.iter().map(|token| (*token).to_owned()).collect())
		.collect())
}
