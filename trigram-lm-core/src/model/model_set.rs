use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::corpus::CorpusSource;
use crate::error::{Error, Result};
use crate::io;
use crate::model::trigram_model::TrigramModel;
use crate::model::weights::SmoothingWeights;

/// A collection of named trigram models.
///
/// # Responsibilities
/// - Build one model per training corpus found in a directory
/// - Score the same evaluation source under every model
/// - Pick the model that fits the source best (lowest perplexity)
#[derive(Debug, Default)]
pub struct ModelSet {
	models: HashMap<String, TrigramModel>,
}

impl ModelSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a model for every `*.{extension}` file directly inside `dir`.
	///
	/// # Parameters
	/// - `dir`: Directory containing training corpora.
	///   `"."` and `"./"` resolve to the current directory.
	/// - `extension`: Extension of the corpus files, without the dot.
	/// - `weights`: Smoothing weights shared by every model.
	/// - `cached`: Reuse / write `<stem>.bin` snapshots next to each corpus.
	///
	/// The model name is the file name without extension.
	///
	/// # Errors
	/// - `InvalidArgument` if `dir` is not a directory
	/// - Any error raised while building a model
	pub fn load_dir<P: AsRef<Path>>(
		dir: P,
		extension: &str,
		weights: SmoothingWeights,
		cached: bool,
	) -> Result<Self> {
		let folder = io::normalize_folder(dir.as_ref());
		if !folder.is_dir() {
			return Err(Error::InvalidArgument(format!("Expected a directory, got: {}", folder.display())));
		}

		let mut set = Self::new();
		for path in io::list_files(&folder, extension)? {
			let name = io::get_filename(&path)?;
			let model = if cached {
				TrigramModel::build_cached(&path, weights)?
			} else {
				TrigramModel::build_with_weights(path.as_path(), weights)?
			};
			model.log_summary(&name);
			set.insert(name, model);
		}

		Ok(set)
	}

	/// Adds a model, returning the one previously stored under `name`.
	pub fn insert(&mut self, name: impl Into<String>, model: TrigramModel) -> Option<TrigramModel> {
		self.models.insert(name.into(), model)
	}

	/// # Errors
	/// Returns `ModelNotFound` for an unknown name.
	pub fn get(&self, name: &str) -> Result<&TrigramModel> {
		self.models.get(name).ok_or_else(|| Error::ModelNotFound(name.to_owned()))
	}

	/// Model names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.models.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.models.len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.is_empty()
	}

	/// Perplexity of `source` under every model, best fit first.
	///
	/// Each model re-reads the source with its own lexicon.
	pub fn rank<S: CorpusSource + ?Sized>(&self, source: &S) -> Result<Vec<(String, f64)>> {
		let mut scored = Vec::with_capacity(self.models.len());
		for (name, model) in &self.models {
			let perplexity = model.perplexity(source)?;
			debug!("{name}: perplexity {perplexity:.4}");
			scored.push((name.clone(), perplexity));
		}

		scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
		Ok(scored)
	}

	/// Name of the model with the lowest perplexity on `source`.
	///
	/// Returns `None` if the set is empty.
	pub fn best_match<S: CorpusSource + ?Sized>(&self, source: &S) -> Result<Option<String>> {
		Ok(self.rank(source)?.into_iter().next().map(|(name, _)| name))
	}
}
