use super::evaluation::{evaluate, Boundaries, Evaluation};
use super::Sentence;
use crate::error::Result;

/// Common surface of every language model in this crate.
///
/// A model is trained once on a whole corpus and is read-only afterwards,
/// so it can be shared between threads while a corpus is being scored.
pub trait LanguageModel: Send + Sync {
	/// Short name used in logs and reports.
	fn name(&self) -> &'static str;

	/// Trains on `sentences` and calculates probabilities.
	fn train(&mut self, sentences: &[Sentence]) -> Result<()>;

	/// Log probability of `sentence`, boundary prediction included.
	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64>;

	/// Log probability of `sentence`, boundary prediction excluded.
	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64>;

	/// Per-position probabilities, in the order the model predicts them.
	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>>;

	/// Corpus perplexity including boundary predictions.
	fn test(&self, sentences: &[Sentence]) -> Result<Evaluation> {
		evaluate(self, sentences, Boundaries::Included)
	}

	/// Corpus perplexity excluding boundary predictions.
	fn test2(&self, sentences: &[Sentence]) -> Result<Evaluation> {
		evaluate(self, sentences, Boundaries::Excluded)
	}
}
