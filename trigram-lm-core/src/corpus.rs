use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::model::lexicon::{Lexicon, UNK};

/// A text source that can be read from the beginning any number of times.
///
/// Model construction needs two full passes over the training data, so a
/// source is reopened for every pass instead of being cached in memory.
pub trait CorpusSource {
	type Reader<'a>: BufRead
	where
		Self: 'a;

	/// Opens a fresh reader positioned at the start of the source.
	fn open(&self) -> io::Result<Self::Reader<'_>>;
}

impl CorpusSource for Path {
	type Reader<'a> = BufReader<File>;

	fn open(&self) -> io::Result<Self::Reader<'_>> {
		Ok(BufReader::new(File::open(self)?))
	}
}

impl CorpusSource for PathBuf {
	type Reader<'a> = BufReader<File>;

	fn open(&self) -> io::Result<Self::Reader<'_>> {
		self.as_path().open()
	}
}

/// A corpus held in memory, one sentence per line.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCorpus {
	text: String,
}

impl InMemoryCorpus {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into() }
	}

	/// Builds a corpus from already split lines.
	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut text = String::new();
		for line in lines {
			text.push_str(line.as_ref());
			text.push('\n');
		}
		Self { text }
	}
}

impl CorpusSource for InMemoryCorpus {
	type Reader<'a> = &'a [u8];

	fn open(&self) -> io::Result<Self::Reader<'_>> {
		Ok(self.text.as_bytes())
	}
}

/// Lazy iterator over the sentences of one reading pass.
///
/// Each non-blank line is lowercased and split on whitespace. When a lexicon
/// is attached, tokens missing from it are replaced by `UNK`.
pub struct Sentences<'l, R> {
	lines: io::Lines<R>,
	lexicon: Option<&'l Lexicon>,
}

impl<'l, R: BufRead> Sentences<'l, R> {
	pub fn new(reader: R, lexicon: Option<&'l Lexicon>) -> Self {
		Self { lines: reader.lines(), lexicon }
	}
}

impl<R: BufRead> Iterator for Sentences<'_, R> {
	type Item = io::Result<Vec<String>>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let line = match self.lines.next()? {
				Ok(line) => line,
				Err(e) => return Some(Err(e)),
			};
			if line.trim().is_empty() {
				continue;
			}
			return Some(Ok(tokenize(&line, self.lexicon)));
		}
	}
}

/// Opens `source` and returns its sentences, optionally UNK-mapped.
///
/// # Errors
/// Returns the I/O error if the source cannot be opened. Read errors on
/// later lines are yielded by the iterator.
pub fn read_corpus<'s, 'l, S>(
	source: &'s S,
	lexicon: Option<&'l Lexicon>,
) -> io::Result<Sentences<'l, S::Reader<'s>>>
where
	S: CorpusSource + ?Sized,
{
	Ok(Sentences::new(source.open()?, lexicon))
}

/// Normalizes one line into tokens.
pub fn tokenize(line: &str, lexicon: Option<&Lexicon>) -> Vec<String> {
	let lowered = line.to_lowercase();
	let tokens = lowered.split_whitespace();
	match lexicon {
		Some(lexicon) => tokens
			.map(|word| if lexicon.contains(word) { word.to_owned() } else { UNK.to_owned() })
			.collect(),
		None => tokens.map(str::to_owned).collect(),
	}
}
