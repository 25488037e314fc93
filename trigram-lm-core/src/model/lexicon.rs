use std::collections::{HashMap, HashSet};

use log::info;
use serde::{Deserialize, Serialize};

/// Padding token placed before the first word of a sentence.
pub const START: &str = "START";
/// Padding token placed after the last word of a sentence.
pub const STOP: &str = "STOP";
/// Replacement for every token outside the lexicon.
pub const UNK: &str = "UNK";

/// Closed vocabulary of a model.
///
/// Holds every token seen more than once in the training corpus plus the
/// three sentinels. It is never modified once built.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Lexicon {
	words: HashSet<String>,
}

impl Lexicon {
	/// Builds a lexicon from already tokenized sentences.
	pub fn from_sentences<I, S>(sentences: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[String]>,
	{
		let mut builder = LexiconBuilder::new();
		for sentence in sentences {
			builder.add_sentence(sentence.as_ref());
		}
		builder.finish()
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(word)
	}

	/// Number of tokens, sentinels included.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Never true: the sentinels are always present.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}
}

/// Accumulates token frequencies during the lexicon pass.
#[derive(Default, Debug)]
pub struct LexiconBuilder {
	word_counts: HashMap<String, usize>,
}

impl LexiconBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records every token of one sentence.
	pub fn add_sentence(&mut self, sentence: &[String]) {
		for word in sentence {
			*self.word_counts.entry(word.clone()).or_insert(0) += 1;
		}
	}

	/// Keeps tokens seen more than once and adds the sentinels.
	pub fn finish(self) -> Lexicon {
		let mut words: HashSet<String> = self
			.word_counts
			.into_iter()
			.filter(|(_, count)| *count > 1)
			.map(|(word, _)| word)
			.collect();

		for sentinel in [UNK, START, STOP] {
			words.insert(sentinel.to_owned());
		}

		info!("Lexicon built with {} tokens", words.len());
		Lexicon { words }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sentence(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	#[test]
	fn test_singletons_are_excluded() {
		let lexicon = Lexicon::from_sentences([sentence(&["a", "a", "b"])]);
		let mut words: Vec<&str> = lexicon.iter().collect();
		words.sort();
		assert_eq!(words, vec!["START", "STOP", "UNK", "a"]);
	}

	#[test]
	fn test_counts_span_sentences() {
		let lexicon = Lexicon::from_sentences([sentence(&["x", "y"]), sentence(&["y", "z"])]);
		assert!(lexicon.contains("y"));
		assert!(!lexicon.contains("x"));
		assert!(!lexicon.contains("z"));
	}

	#[test]
	fn test_empty_corpus_keeps_sentinels() {
		let lexicon = Lexicon::from_sentences(Vec::<Vec<String>>::new());
		assert_eq!(lexicon.len(), 3);
		assert!(lexicon.contains(START) && lexicon.contains(STOP) && lexicon.contains(UNK));
	}
}
