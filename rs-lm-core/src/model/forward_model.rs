use super::bigram_model::BigramModel;
use super::direction::Direction;
use super::language_model::LanguageModel;
use super::weights::Interpolation;
use super::Sentence;
use crate::error::Result;

/// Left-to-right bigram model.
///
/// Predicts each token from the one before it, starting from `<S>` and
/// finishing with the prediction of `</S>`.
#[derive(Clone, Debug)]
pub struct ForwardModel {
	engine: BigramModel,
}

impl ForwardModel {
	/// Creates an untrained model with the default interpolation (0.1 / 0.9).
	pub fn new() -> Self {
		Self::with_interpolation(Interpolation::default())
	}

	pub fn with_interpolation(interpolation: Interpolation) -> Self {
		Self { engine: BigramModel::new(Direction::Forward, interpolation) }
	}

	/// Read-only access to the underlying engine (probabilities, vocabulary).
	pub fn engine(&self) -> &BigramModel {
		&self.engine
	}

	/// Accumulates counts for one sentence, see [`BigramModel::train_sentence`].
	pub fn train_sentence(&mut self, sentence: &[String]) -> Result<()> {
		self.engine.train_sentence(sentence)
	}

	/// One-shot conversion of counts into probabilities.
	pub fn calculate_probs(&mut self) -> Result<()> {
		self.engine.calculate_probs()
	}

	pub fn interpolated_prob(&self, unigram: f64, bigram: Option<f64>) -> f64 {
		self.engine.interpolated_prob(unigram, bigram)
	}
}

impl Default for ForwardModel {
	fn default() -> Self {
		Self::new()
	}
}

impl LanguageModel for ForwardModel {
	fn name(&self) -> &'static str {
		"forward"
	}

	fn train(&mut self, sentences: &[Sentence]) -> Result<()> {
		self.engine.train(sentences)
	}

	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		self.engine.sentence_log_prob(sentence)
	}

	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		self.engine.sentence_log_prob2(sentence)
	}

	/// `[P(w1 | <S>), P(w2 | w1), ..., P(</S> | wN)]`
	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		self.engine.sentence_token_probs(sentence)
	}
}
