use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::corpus::{CorpusSource, read_corpus};
use crate::error::{Error, Result};
use crate::io::build_output_path;
use crate::model::counts::{CountsBuilder, NGramCounts};
use crate::model::lexicon::{Lexicon, LexiconBuilder, START, UNK};
use crate::model::ngram::extract_ngrams;
use crate::model::weights::SmoothingWeights;

/// Word-level trigram language model with linear interpolation.
///
/// # Responsibilities
/// - Build a closed lexicon and frequency tables from a training corpus
/// - Estimate raw unigram / bigram / trigram probabilities with fallbacks
/// - Interpolate the three orders into a smoothed trigram probability
/// - Score sentences (base-2 log-probability) and corpora (perplexity)
///
/// # Invariants
/// - Lexicon and counts are built once and never mutated
/// - Every query is a pure read, so a shared `&TrigramModel` can be used
///   from several threads
/// - Tokens given to the estimator are expected to be lexicon members
///   (`map_unknown` / `read_corpus` with the model lexicon take care of it)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrigramModel {
	lexicon: Lexicon,
	counts: NGramCounts,
	weights: SmoothingWeights,
}

impl TrigramModel {
	/// Builds a model with equal-thirds smoothing weights.
	///
	/// See `build_with_weights`.
	pub fn build<S: CorpusSource + ?Sized>(source: &S) -> Result<Self> {
		Self::build_with_weights(source, SmoothingWeights::default())
	}

	/// Builds a model in two passes over `source`.
	///
	/// 1. Reads the raw corpus to build the lexicon.
	/// 2. Re-reads it with `UNK` substitution and counts n-grams.
	///
	/// # Errors
	/// - `Stream` if the source cannot be read
	/// - `EmptyCorpus` if it contains no sentence
	pub fn build_with_weights<S: CorpusSource + ?Sized>(
		source: &S,
		weights: SmoothingWeights,
	) -> Result<Self> {
		let mut lexicon_builder = LexiconBuilder::new();
		for sentence in read_corpus(source, None)? {
			lexicon_builder.add_sentence(&sentence?);
		}
		let lexicon = lexicon_builder.finish();

		let mut counts_builder = CountsBuilder::new();
		for sentence in read_corpus(source, Some(&lexicon))? {
			counts_builder.add_sentence(&sentence?)?;
		}
		let counts = counts_builder.finish();

		if counts.num_sentences() == 0 {
			return Err(Error::EmptyCorpus);
		}

		Ok(Self { lexicon, counts, weights })
	}

	/// Loads `<stem>.bin` next to `corpus_path` if it exists, otherwise
	/// builds the model from the corpus and writes the snapshot.
	///
	/// The given weights replace the ones stored in the snapshot.
	pub fn build_cached<P: AsRef<Path>>(corpus_path: P, weights: SmoothingWeights) -> Result<Self> {
		let corpus_path = corpus_path.as_ref();
		let binary_data_path = build_output_path(corpus_path, "bin")?;

		if binary_data_path.exists() {
			debug!("Loading cached model {}", binary_data_path.display());
			let mut model = Self::load(&binary_data_path)?;
			model.weights = weights;
			return Ok(model);
		}

		debug!("No cached model for {}, building", corpus_path.display());
		let model = Self::build_with_weights(corpus_path, weights)?;
		model.save(&binary_data_path)?;
		Ok(model)
	}

	/// Writes a compact binary snapshot of the model.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Reads a snapshot written by `save`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the stored weights do not pass
	/// `SmoothingWeights::new`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = std::fs::read(path)?;
		let mut model: Self = postcard::from_bytes(&bytes)?;
		let weights = model.weights;
		model.weights = SmoothingWeights::new(weights.trigram(), weights.bigram(), weights.unigram())?;
		Ok(model)
	}

	/// Logs a one-line summary of the model.
	pub fn log_summary(&self, name: &str) {
		info!(
			"Model {name}: {} lexicon tokens, {} sentences, {} words",
			self.lexicon.len(),
			self.num_sentences(),
			self.total_word_count()
		);
	}

	pub fn lexicon(&self) -> &Lexicon {
		&self.lexicon
	}

	pub fn counts(&self) -> &NGramCounts {
		&self.counts
	}

	pub fn weights(&self) -> SmoothingWeights {
		self.weights
	}

	/// Replaces the interpolation weights. Counts are left untouched.
	pub fn set_weights(&mut self, weights: SmoothingWeights) {
		self.weights = weights;
	}

	pub fn num_sentences(&self) -> u64 {
		self.counts.num_sentences()
	}

	pub fn total_word_count(&self) -> u64 {
		self.counts.total_word_count()
	}

	/// Replaces every token missing from the lexicon with `UNK`.
	pub fn map_unknown<S: AsRef<str>>(&self, sentence: &[S]) -> Vec<String> {
		sentence
			.iter()
			.map(|word| {
				let word = word.as_ref();
				if self.lexicon.contains(word) { word.to_owned() } else { UNK.to_owned() }
			})
			.collect()
	}

	fn uniform_probability(&self) -> f64 {
		1.0 / self.lexicon.len() as f64
	}

	/// `P(w)`: relative frequency, or `1 / |lexicon|` for an unseen token.
	pub fn raw_unigram_probability(&self, word: &str) -> f64 {
		let unigram_count = self.counts.count(&[word]);
		if unigram_count == 0 {
			return self.uniform_probability();
		}
		unigram_count as f64 / self.counts.total_word_count() as f64
	}

	/// `P(w2 | w1)`: backs off to `P(w2)` when `w1` has no unigram count
	/// (which is always the case for `START`).
	pub fn raw_bigram_probability(&self, bigram: [&str; 2]) -> f64 {
		let [w1, w2] = bigram;
		let unigram_count = self.counts.count(&[w1]);
		if unigram_count == 0 {
			return self.raw_unigram_probability(w2);
		}
		self.counts.count(&bigram) as f64 / unigram_count as f64
	}

	/// `P(w3 | w1, w2)`.
	///
	/// - `(START, START, w)`: share of sentences beginning with `w`
	/// - unseen trigram: `1 / |lexicon|`, checked before the context count
	/// - unseen context: backs off to `P(w3)`
	/// - otherwise: `count(w1, w2, w3) / count(w1, w2)`
	pub fn raw_trigram_probability(&self, trigram: [&str; 3]) -> f64 {
		let [w1, w2, w3] = trigram;
		if w1 == START && w2 == START {
			return self.counts.count(&[START, w3]) as f64 / self.counts.num_sentences() as f64;
		}

		let trigram_count = self.counts.count(&trigram);
		if trigram_count == 0 {
			return self.uniform_probability();
		}
		let bigram_count = self.counts.count(&[w1, w2]);
		if bigram_count == 0 {
			return self.raw_unigram_probability(w3);
		}
		trigram_count as f64 / bigram_count as f64
	}

	/// Linear interpolation of the three raw estimates.
	pub fn smoothed_trigram_probability(&self, trigram: [&str; 3]) -> f64 {
		let [_, w2, w3] = trigram;
		self.weights.trigram() * self.raw_trigram_probability(trigram)
			+ self.weights.bigram() * self.raw_bigram_probability([w2, w3])
			+ self.weights.unigram() * self.raw_unigram_probability(w3)
	}

	/// Base-2 log-probability of a sentence, summed over its padded trigrams.
	///
	/// The sentence is scored as given; map it with `map_unknown` first if
	/// it may contain tokens outside the lexicon.
	///
	/// # Errors
	/// Returns `MathDomain` if a smoothed probability is not strictly positive.
	pub fn sentence_logprob<S: AsRef<str>>(&self, sentence: &[S]) -> Result<f64> {
		let mut logprob = 0.0;
		for ngram in extract_ngrams(sentence, 3)? {
			let trigram = [ngram[0].as_str(), ngram[1].as_str(), ngram[2].as_str()];
			let probability = self.smoothed_trigram_probability(trigram);
			if probability.is_nan() || probability <= 0.0 {
				return Err(Error::MathDomain { trigram: trigram.join(" "), probability });
			}
			logprob += probability.log2();
		}
		Ok(logprob)
	}

	/// Perplexity of an evaluation corpus, read with this model's lexicon.
	///
	/// `2^(-total_logprob / total_tokens)` where every sentence contributes
	/// its length plus one (for `STOP`). Lower is better.
	///
	/// # Errors
	/// - `Stream` if the source cannot be read
	/// - `EmptyCorpus` if it contains no sentence
	/// - `MathDomain` as in `sentence_logprob`
	pub fn perplexity<S: CorpusSource + ?Sized>(&self, source: &S) -> Result<f64> {
		let mut accumulator = PerplexityAccumulator::default();
		for sentence in read_corpus(source, Some(&self.lexicon))? {
			accumulator.add(self, &sentence?)?;
		}
		accumulator.finish()
	}

	/// Perplexity of in-memory sentences, scored as given.
	pub fn perplexity_of_sentences<I, S>(&self, sentences: I) -> Result<f64>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[String]>,
	{
		let mut accumulator = PerplexityAccumulator::default();
		for sentence in sentences {
			accumulator.add(self, sentence.as_ref())?;
		}
		accumulator.finish()
	}
}

#[derive(Default)]
struct PerplexityAccumulator {
	logprob: f64,
	tokens: u64,
	sentences: u64,
}

impl PerplexityAccumulator {
	fn add(&mut self, model: &TrigramModel, sentence: &[String]) -> Result<()> {
		self.logprob += model.sentence_logprob(sentence)?;
		self.tokens += sentence.len() as u64 + 1;
		self.sentences += 1;
		Ok(())
	}

	fn finish(self) -> Result<f64> {
		if self.sentences == 0 {
			return Err(Error::EmptyCorpus);
		}
		let perplexity = (-self.logprob / self.tokens as f64).exp2();
		debug!("Perplexity {perplexity:.4} over {} sentences, {} tokens", self.sentences, self.tokens);
		Ok(perplexity)
	}
}
