use std::collections::HashMap;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tempfile::TempDir;

use trigram_lm_core::Error;
use trigram_lm_core::corpus::{InMemoryCorpus, read_corpus};
use trigram_lm_core::model::lexicon::{START, STOP, UNK};
use trigram_lm_core::model::ngram::{NGram, extract_ngrams};
use trigram_lm_core::model::trigram_model::TrigramModel;
use trigram_lm_core::model::weights::SmoothingWeights;

const TRAIN: &str = "\
The quick brown fox jumps over the lazy dog
the lazy dog sleeps in the sun
the quick brown fox runs in the field

a quick brown dog jumps over the fox
the fox sleeps in the field
the dog runs over the field
";

fn write_corpus(dir: &TempDir, name: &str, text: &str) -> PathBuf {
	let path = dir.path().join(name);
	std::fs::write(&path, text).unwrap();
	path
}

fn training_sentences(model: &TrigramModel) -> Vec<Vec<String>> {
	read_corpus(&InMemoryCorpus::new(TRAIN), Some(model.lexicon()))
		.unwrap()
		.map(Result::unwrap)
		.collect()
}

#[test]
fn test_build_from_file_matches_in_memory() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_corpus(&dir, "train.txt", TRAIN);

	let from_file = TrigramModel::build(&path).unwrap();
	let in_memory = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();

	assert_eq!(from_file.lexicon(), in_memory.lexicon());
	assert_eq!(from_file.counts(), in_memory.counts());
	assert_eq!(from_file.num_sentences(), 6);
}

#[test]
fn test_missing_corpus_is_a_stream_error() {
	let dir = tempfile::tempdir().unwrap();
	let result = TrigramModel::build(&dir.path().join("missing.txt"));
	assert!(matches!(result, Err(Error::Stream(_))));
}

#[test]
fn test_unreadable_line_is_a_stream_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("broken.txt");
	std::fs::write(&path, b"the lazy dog\nthe quick fox\n\xff\xfe fox\nthe dog\n").unwrap();

	let result = TrigramModel::build(&path);
	assert!(matches!(result, Err(Error::Stream(_))));

	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();
	assert!(matches!(model.perplexity(&path), Err(Error::Stream(_))));
}

#[test]
fn test_recounting_reproduces_tables() {
	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();

	let mut tables: [HashMap<NGram, u64>; 3] = Default::default();
	for sentence in training_sentences(&model) {
		for (i, table) in tables.iter_mut().enumerate() {
			for ngram in extract_ngrams(sentence.as_slice(), i + 1).unwrap() {
				*table.entry(ngram).or_insert(0) += 1;
			}
		}
	}

	assert_eq!(&tables[0], model.counts().unigrams());
	assert_eq!(&tables[1], model.counts().bigrams());
	assert_eq!(&tables[2], model.counts().trigrams());
	assert_eq!(model.total_word_count(), tables[0].values().sum::<u64>());
}

#[test]
fn test_sentence_start_probability() {
	let model = TrigramModel::build(&InMemoryCorpus::new("a b c\na c\nb a\n")).unwrap();
	assert_eq!(model.num_sentences(), 3);

	for word in ["a", "b", "c", UNK, STOP] {
		let expected = model.counts().count(&[START, word]) as f64 / 3.0;
		assert_eq!(model.raw_trigram_probability([START, START, word]), expected);
	}
	assert_eq!(model.raw_trigram_probability([START, START, "a"]), 2.0 / 3.0);
}

#[test]
fn test_unigram_probabilities_in_range() {
	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();
	for word in model.lexicon().iter() {
		let p = model.raw_unigram_probability(word);
		assert!(p > 0.0 && p <= 1.0);
		if model.counts().count(&[word]) == 0 {
			assert_eq!(p, 1.0 / model.lexicon().len() as f64);
		}
	}
}

#[test]
fn test_smoothed_probabilities_are_valid() {
	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();
	let words: Vec<&str> = model.lexicon().iter().collect();
	for &w1 in &words {
		for &w2 in &words {
			for &w3 in &words {
				let p = model.smoothed_trigram_probability([w1, w2, w3]);
				assert!(p > 0.0 && p <= 1.0, "P({w3} | {w1} {w2}) = {p}");
			}
		}
	}
}

#[test]
fn test_training_corpus_beats_shuffled_tokens() {
	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();
	let sentences = training_sentences(&model);

	let mut tokens: Vec<String> = sentences.iter().flatten().cloned().collect();
	tokens.shuffle(&mut StdRng::seed_from_u64(7));
	let mut shuffled = Vec::new();
	let mut rest = tokens.as_slice();
	for sentence in &sentences {
		let (head, tail) = rest.split_at(sentence.len());
		shuffled.push(head.to_vec());
		rest = tail;
	}

	let trained = model.perplexity(&InMemoryCorpus::new(TRAIN)).unwrap();
	let baseline = model.perplexity_of_sentences(&shuffled).unwrap();
	assert!(trained < baseline, "trained {trained} >= shuffled {baseline}");
}

#[test]
fn test_perplexity_maps_unknown_words() {
	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();
	let raw = model.perplexity(&InMemoryCorpus::new("the zebra jumps over the fox\n")).unwrap();
	let mapped = model
		.perplexity_of_sentences([model.map_unknown(&["the", "zebra", "jumps", "over", "the", "fox"])])
		.unwrap();
	assert_eq!(raw, mapped);
}

#[test]
fn test_snapshot_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let model = TrigramModel::build(&InMemoryCorpus::new(TRAIN)).unwrap();
	let path = dir.path().join("model.bin");

	model.save(&path).unwrap();
	let loaded = TrigramModel::load(&path).unwrap();

	assert_eq!(loaded.lexicon(), model.lexicon());
	assert_eq!(loaded.counts(), model.counts());
	assert_eq!(loaded.weights(), model.weights());
	assert_eq!(
		loaded.sentence_logprob(&["the", "lazy", "dog"]).unwrap(),
		model.sentence_logprob(&["the", "lazy", "dog"]).unwrap()
	);
}

#[test]
fn test_build_cached_writes_then_reuses_snapshot() {
	let dir = tempfile::tempdir().unwrap();
	let corpus = write_corpus(&dir, "train.txt", TRAIN);
	let snapshot = dir.path().join("train.bin");

	let built = TrigramModel::build_cached(&corpus, SmoothingWeights::default()).unwrap();
	assert!(snapshot.exists());

	// The snapshot wins over the (now different) corpus text.
	std::fs::write(&corpus, "something else entirely\n").unwrap();
	let weights = SmoothingWeights::new(0.5, 0.3, 0.2).unwrap();
	let cached = TrigramModel::build_cached(&corpus, weights).unwrap();

	assert_eq!(cached.counts(), built.counts());
	assert_eq!(cached.weights(), weights);
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_corpus(&dir, "model.bin", "not a model");
	assert!(TrigramModel::load(&path).is_err());
}
