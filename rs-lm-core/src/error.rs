use thiserror::Error;

/// Errors produced while loading corpora, training models or scoring sentences.
///
/// Unknown tokens are never an error: they are silently scored as `<UNK>`.
#[derive(Error, Debug)]
pub enum LmError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Malformed tagged token '{token}' in {source_name}")]
	MalformedToken { source_name: String, token: String },

	#[error("Invalid weights: {0}")]
	InvalidWeights(String),

	#[error("Test fraction must be strictly between 0 and 1, got {0}")]
	InvalidTestFraction(f64),

	#[error("Splitting {sentences} sentences leaves {train} for training and {test} for testing, both parts need at least one")]
	EmptySplit { sentences: usize, train: usize, test: usize },

	#[error("Probabilities have already been calculated for this model")]
	AlreadyNormalized,

	#[error("Model is already trained, build a new model to train again")]
	AlreadyTrained,

	#[error("Model is not trained yet")]
	NotTrained,

	#[error("Cannot train or evaluate on an empty corpus")]
	EmptyCorpus,

	#[error("Token '{0}' is missing from the vocabulary")]
	MissingToken(String),

	#[error("Probability sequence length mismatch: expected {expected}, forward gave {forward}, backward gave {backward}")]
	SequenceLengthMismatch {
		expected: usize,
		forward: usize,
		backward: usize,
	},
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LmError>;
