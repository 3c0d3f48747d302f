use super::bigram_model::BigramModel;
use super::direction::Direction;
use super::language_model::LanguageModel;
use super::weights::Interpolation;
use super::Sentence;
use crate::error::Result;

/// Right-to-left bigram model.
///
/// Wraps the shared engine configured for backward traversal: each token is
/// predicted from the token that follows it, starting from `</S>` and
/// finishing with the prediction of `<S>`. Callers pass sentences in their
/// natural order, the reversal is internal.
#[derive(Clone, Debug)]
pub struct BackwardModel {
	engine: BigramModel,
}

impl BackwardModel {
	/// Creates an untrained model with the default interpolation (0.1 / 0.9).
	pub fn new() -> Self {
		Self::with_interpolation(Interpolation::default())
	}

	pub fn with_interpolation(interpolation: Interpolation) -> Self {
		Self { engine: BigramModel::new(Direction::Backward, interpolation) }
	}

	pub fn engine(&self) -> &BigramModel {
		&self.engine
	}

	pub fn train_sentence(&mut self, sentence: &[String]) -> Result<()> {
		self.engine.train_sentence(sentence)
	}

	pub fn calculate_probs(&mut self) -> Result<()> {
		self.engine.calculate_probs()
	}

	pub fn interpolated_prob(&self, unigram: f64, bigram: Option<f64>) -> f64 {
		self.engine.interpolated_prob(unigram, bigram)
	}
}

impl Default for BackwardModel {
	fn default() -> Self {
		Self::new()
	}
}

impl LanguageModel for BackwardModel {
	fn name(&self) -> &'static str {
		"backward"
	}

	fn train(&mut self, sentences: &[Sentence]) -> Result<()> {
		self.engine.train(sentences)
	}

	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		self.engine.sentence_log_prob(sentence)
	}

	/// Excludes the prediction of `<S>`.
	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		self.engine.sentence_log_prob2(sentence)
	}

	/// Probabilities in backward order:
	/// `[P(wN | </S>), P(wN-1 | wN), ..., P(w1 | w2), P(<S> | w1)]`
	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		self.engine.sentence_token_probs(sentence)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::direction::{END, START};
	use crate::model::forward_model::ForwardModel;

	fn sentence(words: &[&str]) -> Sentence {
		words.iter().map(|w| w.to_string()).collect()
	}

	fn corpus() -> Vec<Sentence> {
		vec![
			sentence(&["the", "cat", "sat"]),
			sentence(&["the", "dog", "ran"]),
			sentence(&["a", "cat", "ran", "away"]),
		]
	}

	#[test]
	fn last_probability_predicts_sentence_start() {
		let mut model = BackwardModel::new();
		model.train(&corpus()).unwrap();

		let probs = model.sentence_token_probs(&sentence(&["the", "cat"])).unwrap();
		let engine = model.engine();
		let expected = engine.interpolated_prob(
			engine.unigram_prob(START).unwrap(),
			engine.bigram_prob("the", START),
		);
		assert_eq!(probs.len(), 3);
		assert_eq!(probs[2], expected);
	}

	#[test]
	fn first_probability_is_conditioned_on_sentence_end() {
		let mut model = BackwardModel::new();
		model.train(&corpus()).unwrap();

		let probs = model.sentence_token_probs(&sentence(&["the", "cat"])).unwrap();
		let engine = model.engine();
		let expected = engine.interpolated_prob(
			engine.unigram_prob("cat").unwrap(),
			engine.bigram_prob(END, "cat"),
		);
		assert_eq!(probs[0], expected);
	}

	#[test]
	fn unigram_only_scores_match_the_forward_model() {
		let interpolation = Interpolation::new(1.0, 0.0).unwrap();
		let mut forward = ForwardModel::with_interpolation(interpolation);
		let mut backward = BackwardModel::with_interpolation(interpolation);
		forward.train(&corpus()).unwrap();
		backward.train(&corpus()).unwrap();

		for query in [sentence(&["cat", "the", "ran"]), sentence(&["ran"]), sentence(&["x", "cat"])] {
			let f = forward.sentence_log_prob2(&query).unwrap();
			let b = backward.sentence_log_prob2(&query).unwrap();
			assert!((f - b).abs() < 1e-12, "{f} != {b}");
		}
	}

	#[test]
	fn backward_vocabulary_is_independent_from_forward() {
		let mut backward = BackwardModel::new();
		backward.train(&corpus()).unwrap();
		let forward = ForwardModel::new();
		assert_eq!(forward.engine().vocabulary_size(), 3);
		assert!(backward.engine().vocabulary_size() > 3);
	}
}
