use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use trigram_lm_core::corpus::read_corpus;
use trigram_lm_core::model::model_set::ModelSet;
use trigram_lm_core::model::trigram_model::TrigramModel;
use trigram_lm_core::model::weights::SmoothingWeights;

#[derive(Parser, Debug)]
#[command(name = "trigram-lm")]
#[command(about = "Train a trigram language model and score corpora by perplexity")]
#[command(version)]
struct Args {
    /// Training corpus, one sentence per line
    train: PathBuf,

    /// Evaluation corpora to score with the trained model
    eval: Vec<PathBuf>,

    /// Interpolation intensities "trigram,bigram,unigram" (normalized to sum to 1)
    #[arg(short, long, value_parser = parse_weights)]
    weights: Option<SmoothingWeights>,

    /// Reuse or write a `.bin` snapshot next to each training corpus
    #[arg(long)]
    cache: bool,

    /// Directory of training corpora; each evaluation corpus is assigned to
    /// the model with the lowest perplexity
    #[arg(short, long)]
    models: Option<PathBuf>,

    /// Extension of the corpus files in `--models`
    #[arg(long, default_value = "txt")]
    extension: String,

    /// Seed for the shuffled-token baseline
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn parse_weights(value: &str) -> Result<SmoothingWeights, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<f64>, String>>()?;
    match parts.as_slice() {
        [trigram, bigram, unigram] => {
            SmoothingWeights::normalized(*trigram, *bigram, *unigram).map_err(|e| e.to_string())
        }
        _ => Err("expected three comma-separated values".to_owned()),
    }
}

/// Perplexity of the evaluation corpus once its tokens are shuffled across
/// sentences (sentence lengths are kept).
fn shuffled_baseline(model: &TrigramModel, eval: &Path, seed: u64) -> Result<f64, Box<dyn std::error::Error>> {
    let sentences = read_corpus(eval, Some(model.lexicon()))?.collect::<Result<Vec<_>, _>>()?;

    let mut tokens: Vec<String> = sentences.iter().flatten().cloned().collect();
    tokens.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut shuffled = Vec::with_capacity(sentences.len());
    let mut rest = tokens.as_slice();
    for sentence in &sentences {
        let (head, tail) = rest.split_at(sentence.len());
        shuffled.push(head.to_vec());
        rest = tail;
    }

    Ok(model.perplexity_of_sentences(&shuffled)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // Equal thirds unless overridden
    let weights = args.weights.unwrap_or_default();

    // Two passes over the training corpus (or one snapshot read with --cache)
    let model = if args.cache {
        TrigramModel::build_cached(&args.train, weights)?
    } else {
        TrigramModel::build_with_weights(&args.train, weights)?
    };
    model.log_summary(&args.train.display().to_string());

    println!("{}: training perplexity {:.4}", args.train.display(), model.perplexity(&args.train)?);

    for eval in &args.eval {
        let perplexity = model.perplexity(eval)?;
        let baseline = shuffled_baseline(&model, eval, args.seed)?;
        println!(
            "{}: perplexity {:.4} (shuffled baseline {:.4})",
            eval.display(),
            perplexity,
            baseline
        );
    }

    // Optional classification against a directory of models
    if let Some(dir) = &args.models {
        let set = ModelSet::load_dir(dir, &args.extension, weights, args.cache)?;
        info!("Loaded {} models from {}", set.len(), dir.display());

        for eval in &args.eval {
            let ranking = set.rank(eval)?;
            let ranked = ranking
                .iter()
                .map(|(name, perplexity)| format!("{name}={perplexity:.4}"))
                .collect::<Vec<_>>()
                .join(", ");
            match ranking.first() {
                Some((best, _)) => println!("{} -> {} [{}]", eval.display(), best, ranked),
                None => println!("{} -> no model in {}", eval.display(), dir.display()),
            }
        }
    }

    Ok(())
}
