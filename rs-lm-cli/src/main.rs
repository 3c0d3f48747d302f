use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;
use serde::Serialize;

use rs_lm_core::corpus;
use rs_lm_core::model::backward_model::BackwardModel;
use rs_lm_core::model::bidirectional_model::BidirectionalModel;
use rs_lm_core::model::evaluation::Evaluation;
use rs_lm_core::model::forward_model::ForwardModel;
use rs_lm_core::model::language_model::LanguageModel;
use rs_lm_core::model::weights::{FusionWeights, Interpolation};

/// Which model to train and evaluate.
#[derive(ValueEnum, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ModelKind {
	Forward,
	Backward,
	Bidirectional,
}

#[derive(Parser, Debug)]
#[command(name = "rs-lm")]
#[command(about = "Train a bigram language model on POS-tagged text and report perplexity")]
#[command(version)]
struct Args {
	/// Files or directories of LDC POS-tagged text
	#[arg(required = true)]
	paths: Vec<PathBuf>,

	/// Fraction of the sentences used for testing, taken from the end (0 < F < 1)
	#[arg(short, long)]
	test_fraction: f64,

	/// Model to train
	#[arg(short, long, value_enum, default_value_t = ModelKind::Bidirectional)]
	model: ModelKind,

	/// Unigram interpolation weight, the bigram weight is its complement
	#[arg(long, default_value_t = 0.1)]
	unigram_weight: f64,

	/// Forward weight of the bidirectional model, the backward weight is its complement
	#[arg(long, default_value_t = 0.5)]
	forward_weight: f64,

	/// Shuffle sentences with this seed before splitting
	#[arg(long)]
	shuffle: Option<u64>,

	/// Print the report as JSON
	#[arg(long)]
	json: bool,
}

/// Sentence and word counts of one corpus part.
#[derive(Serialize, Debug)]
struct PartSummary {
	sentences: usize,
	words: usize,
}

/// Everything printed at the end of a run.
#[derive(Serialize, Debug)]
struct RunReport {
	model: ModelKind,
	interpolation: Interpolation,
	#[serde(skip_serializing_if = "Option::is_none")]
	fusion: Option<FusionWeights>,
	train: PartSummary,
	test: PartSummary,
	/// `test` then `test2` on the training sentences
	on_train: [Evaluation; 2],
	/// `test` then `test2` on the test sentences
	on_test: [Evaluation; 2],
}

fn build_model(kind: ModelKind, interpolation: Interpolation, fusion: FusionWeights) -> Box<dyn LanguageModel> {
	match kind {
		ModelKind::Forward => Box::new(ForwardModel::with_interpolation(interpolation)),
		ModelKind::Backward => Box::new(BackwardModel::with_interpolation(interpolation)),
		ModelKind::Bidirectional => Box::new(BidirectionalModel::with_config(interpolation, fusion)),
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	// Reject invalid configuration before reading any data
	corpus::validate_test_fraction(args.test_fraction)?;
	let interpolation = Interpolation::from_unigram_weight(args.unigram_weight)?;
	let fusion = FusionWeights::from_forward_weight(args.forward_weight)?;

	let mut sentences = corpus::convert_to_token_lists(&args.paths)?;
	if let Some(seed) = args.shuffle {
		info!("Shuffling sentences with seed {}", seed);
		corpus::shuffle(&mut sentences, seed);
	}
	let (train_sentences, test_sentences) = corpus::split(&sentences, args.test_fraction)?;

	let train = PartSummary { sentences: train_sentences.len(), words: corpus::word_count(train_sentences) };
	let test = PartSummary { sentences: test_sentences.len(), words: corpus::word_count(test_sentences) };
	if !args.json {
		println!("# Train Sentences = {} (# words = {})", train.sentences, train.words);
		println!("# Test Sentences = {} (# words = {})", test.sentences, test.words);
	}

	let mut model = build_model(args.model, interpolation, fusion);
	info!("Training {} model...", model.name());
	model.train(train_sentences)?;

	let on_train = [model.test(train_sentences)?, model.test2(train_sentences)?];
	info!("Testing {} model...", model.name());
	let on_test = [model.test(test_sentences)?, model.test2(test_sentences)?];

	let report = RunReport {
		model: args.model,
		interpolation,
		fusion: (args.model == ModelKind::Bidirectional).then_some(fusion),
		train,
		test,
		on_train,
		on_test,
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		println!("Training data:");
		for evaluation in &report.on_train {
			println!("  {}", evaluation);
		}
		println!("Test data:");
		for evaluation in &report.on_test {
			println!("  {}", evaluation);
		}
	}

	Ok(())
}
