use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ngram::{NGram, extract_ngrams};

/// Frequency tables of a trained model.
///
/// # Invariants
/// - Every stored count is >= 1; absent keys read as zero
/// - `START` and `STOP` never appear in `unigrams`, only inside padded
///   bigrams and trigrams, so `total_word_count` excludes them
/// - Nothing is mutated after `CountsBuilder::finish`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NGramCounts {
	unigrams: HashMap<NGram, u64>,
	bigrams: HashMap<NGram, u64>,
	trigrams: HashMap<NGram, u64>,
	num_sentences: u64,
	total_word_count: u64,
}

impl NGramCounts {
	/// Count of an n-gram of order 1, 2 or 3; zero when absent.
	pub fn count(&self, ngram: &[&str]) -> u64 {
		let table = match ngram.len() {
			1 => &self.unigrams,
			2 => &self.bigrams,
			3 => &self.trigrams,
			_ => return 0,
		};
		let key: NGram = ngram.iter().map(|token| (*token).to_owned()).collect();
		table.get(&key).copied().unwrap_or(0)
	}

	pub fn unigrams(&self) -> &HashMap<NGram, u64> {
		&self.unigrams
	}

	pub fn bigrams(&self) -> &HashMap<NGram, u64> {
		&self.bigrams
	}

	pub fn trigrams(&self) -> &HashMap<NGram, u64> {
		&self.trigrams
	}

	/// Number of sentences seen in the counting pass.
	pub fn num_sentences(&self) -> u64 {
		self.num_sentences
	}

	/// Sum of all unigram counts.
	pub fn total_word_count(&self) -> u64 {
		self.total_word_count
	}
}

/// Mutable accumulator for the counting pass.
///
/// Lives only inside model construction and is consumed by `finish`.
#[derive(Default, Debug)]
pub struct CountsBuilder {
	counts: NGramCounts,
}

impl CountsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds the unigrams, padded bigrams and padded trigrams of one sentence.
	pub fn add_sentence(&mut self, sentence: &[String]) -> Result<()> {
		for (n, table) in [
			(1, &mut self.counts.unigrams),
			(2, &mut self.counts.bigrams),
			(3, &mut self.counts.trigrams),
		] {
			for ngram in extract_ngrams(sentence, n)? {
				*table.entry(ngram).or_insert(0) += 1;
			}
		}
		self.counts.num_sentences += 1;
		Ok(())
	}

	/// Freezes the tables and computes the total word count.
	pub fn finish(mut self) -> NGramCounts {
		self.counts.total_word_count = self.counts.unigrams.values().sum();
		info!(
			"Counted {} sentences, {} words ({} unigrams, {} bigrams, {} trigrams)",
			self.counts.num_sentences,
			self.counts.total_word_count,
			self.counts.unigrams.len(),
			self.counts.bigrams.len(),
			self.counts.trigrams.len()
		);
		self.counts
	}
}
