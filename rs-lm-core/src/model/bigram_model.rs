use std::collections::HashMap;

use log::{debug, info};

use super::count_table::CountTable;
use super::direction::{Direction, END, START, UNKNOWN};
use super::weights::Interpolation;
use super::Sentence;
use crate::error::{LmError, Result};

/// Lifecycle of a directional model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
	/// Tables hold raw counts, training is allowed.
	Counting,
	/// Tables hold probabilities, the model is read-only.
	Probabilities,
}

/// Interpolated bigram engine shared by the forward and backward models.
///
/// The engine walks sentences in its `Direction`, counting the start
/// anchor, every token and the end anchor as unigram events, and every
/// adjacent pair as a bigram event. After `calculate_probs` the same
/// tables hold probabilities and the engine only answers queries.
///
/// # Responsibilities
/// - Accumulate unigram and bigram counts with `<UNK>` substitution
/// - Convert counts to probabilities exactly once
/// - Score sentences with interpolated unigram/bigram probabilities
///
/// # Invariants
/// - Every bigram context and every bigram target has a non-zero unigram entry
/// - `token_count` equals the sum of all unigram counts while counting
/// - Once in `Phase::Probabilities`, tables are never mutated again
#[derive(Clone, Debug)]
pub struct BigramModel {
	direction: Direction,
	interpolation: Interpolation,

	/// Token → count, then token → P(token)
	unigrams: CountTable,

	/// Context → (token → count), then context → (token → P(token | context))
	bigrams: HashMap<String, CountTable>,

	/// Number of unigram events, sentinels included
	token_count: f64,

	phase: Phase,
}

impl BigramModel {
	/// Creates an empty engine walking sentences in `direction`.
	///
	/// Sentinels and `<UNK>` are registered up front so that they always
	/// count as known tokens.
	pub fn new(direction: Direction, interpolation: Interpolation) -> Self {
		let mut unigrams = CountTable::new();
		for reserved in [START, END, UNKNOWN] {
			unigrams.register(reserved);
		}
		Self {
			direction,
			interpolation,
			unigrams,
			bigrams: HashMap::new(),
			token_count: 0.0,
			phase: Phase::Counting,
		}
	}

	pub fn direction(&self) -> Direction {
		self.direction
	}

	pub fn interpolation(&self) -> Interpolation {
		self.interpolation
	}

	/// Returns `true` once probabilities have been calculated.
	pub fn is_trained(&self) -> bool {
		self.phase == Phase::Probabilities
	}

	/// Number of unigram events counted so far (sentinels included).
	pub fn token_count(&self) -> f64 {
		self.token_count
	}

	/// Number of entries in the unigram table.
	///
	/// While counting this includes zero-count placeholders, afterwards
	/// only tokens with a probability remain.
	pub fn vocabulary_size(&self) -> usize {
		self.unigrams.len()
	}

	/// Trains on a whole corpus and calculates probabilities.
	///
	/// # Errors
	/// - `AlreadyTrained` if the model already holds probabilities
	/// - `EmptyCorpus` if `sentences` is empty
	pub fn train(&mut self, sentences: &[Sentence]) -> Result<()> {
		if self.is_trained() {
			return Err(LmError::AlreadyTrained);
		}
		if sentences.is_empty() {
			return Err(LmError::EmptyCorpus);
		}

		for sentence in sentences {
			self.train_sentence(sentence)?;
		}
		self.calculate_probs()?;

		info!(
			"Trained {} model on {} sentences ({} tokens, {} vocabulary entries)",
			self.direction,
			sentences.len(),
			self.token_count,
			self.unigrams.len()
		);
		Ok(())
	}

	/// Accumulates unigram and bigram counts for one sentence.
	///
	/// The first occurrence of a token is counted as `<UNK>` and the token
	/// is registered with a zero count, so that its later occurrences are
	/// counted under its own name.
	///
	/// # Errors
	/// Returns `AlreadyTrained` if probabilities were already calculated.
	pub fn train_sentence(&mut self, sentence: &[String]) -> Result<()> {
		if self.is_trained() {
			return Err(LmError::AlreadyTrained);
		}

		let start = self.direction.start_anchor();
		self.count_unigram(start);

		let mut previous = start;
		for token in self.direction.traverse(sentence) {
			let token = if self.unigrams.register(token) { UNKNOWN } else { token };
			self.count_unigram(token);
			self.count_bigram(previous, token);
			previous = token;
		}

		let end = self.direction.end_anchor();
		self.count_unigram(end);
		self.count_bigram(previous, end);
		Ok(())
	}

	fn count_unigram(&mut self, token: &str) {
		self.unigrams.increment(token);
		self.token_count += 1.0;
	}

	fn count_bigram(&mut self, context: &str, token: &str) {
		self.bigrams.entry(context.to_owned()).or_default().increment(token);
	}

	/// Converts counts into probabilities, in place.
	///
	/// - Bigram `(a, b)` becomes `count(a, b) / count(a)`, i.e. `P(b | a)`
	/// - Unigram `t` becomes `count(t) / token_count`
	/// - Placeholders that were never counted are dropped
	///
	/// # Errors
	/// - `AlreadyNormalized` on a second call, the counts no longer exist
	/// - `EmptyCorpus` if nothing was counted
	pub fn calculate_probs(&mut self) -> Result<()> {
		if self.is_trained() {
			return Err(LmError::AlreadyNormalized);
		}
		if self.token_count == 0.0 {
			return Err(LmError::EmptyCorpus);
		}

		for (context, transitions) in self.bigrams.iter_mut() {
			let context_count = self
				.unigrams
				.get(context)
				.filter(|count| *count > 0.0)
				.ok_or_else(|| LmError::MissingToken(context.clone()))?;
			transitions.scale(context_count);
		}

		let removed = self.unigrams.retain_observed();
		self.unigrams.scale(self.token_count);
		self.phase = Phase::Probabilities;

		debug!(
			"{} model: {} placeholders dropped, {} unigrams, {} bigram contexts",
			self.direction,
			removed,
			self.unigrams.len(),
			self.bigrams.len()
		);
		Ok(())
	}

	/// Unigram probability of `token`, `None` if it is not in the vocabulary
	/// or if the model is not trained.
	pub fn unigram_prob(&self, token: &str) -> Option<f64> {
		if !self.is_trained() {
			return None;
		}
		self.unigrams.get(token)
	}

	/// Conditional probability of `token` given `context` in this model's
	/// direction, `None` if the pair was never observed.
	pub fn bigram_prob(&self, context: &str, token: &str) -> Option<f64> {
		if !self.is_trained() {
			return None;
		}
		self.bigrams.get(context)?.get(token)
	}

	/// Iterates over the unigram probabilities of the trained vocabulary.
	pub fn unigram_probs(&self) -> impl Iterator<Item = (&str, f64)> {
		self.unigrams.iter().filter(|_| self.is_trained())
	}

	/// Interpolates a unigram probability with an optional bigram probability.
	pub fn interpolated_prob(&self, unigram: f64, bigram: Option<f64>) -> f64 {
		self.interpolation.interpolate(unigram, bigram)
	}

	/// Maps a token to itself if it is in the vocabulary, to `<UNK>` otherwise.
	fn resolve<'a>(&self, token: &'a str) -> &'a str {
		if self.unigrams.contains(token) { token } else { UNKNOWN }
	}

	/// Interpolated probability of predicting `token` after `context`.
	fn predict(&self, context: &str, token: &str) -> Result<f64> {
		let unigram = self
			.unigrams
			.get(token)
			.ok_or_else(|| LmError::MissingToken(token.to_owned()))?;
		let bigram = self.bigrams.get(context).and_then(|t| t.get(token));
		Ok(self.interpolated_prob(unigram, bigram))
	}

	/// Probabilities of predicting each token then the end anchor.
	///
	/// The result has `sentence.len() + 1` entries in traversal order: for a
	/// backward engine the first entry predicts the last token and the final
	/// entry predicts `<S>`.
	///
	/// # Errors
	/// - `NotTrained` if probabilities were not calculated yet
	/// - `MissingToken` if `<UNK>` itself is absent (degenerate training data)
	pub fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		if !self.is_trained() {
			return Err(LmError::NotTrained);
		}

		let mut probs = Vec::with_capacity(sentence.len() + 1);
		let mut previous = self.direction.start_anchor();
		for token in self.direction.traverse(sentence) {
			let token = self.resolve(token);
			probs.push(self.predict(previous, token)?);
			previous = token;
		}
		probs.push(self.predict(previous, self.direction.end_anchor())?);
		Ok(probs)
	}

	/// Log probability of the sentence, end anchor prediction included.
	pub fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		let probs = self.sentence_token_probs(sentence)?;
		Ok(probs.iter().map(|p| p.ln()).sum())
	}

	/// Log probability of the sentence tokens only, without the end anchor.
	pub fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		let probs = self.sentence_token_probs(sentence)?;
		Ok(probs[..sentence.len()].iter().map(|p| p.ln()).sum())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPSILON: f64 = 1e-12;

	fn sentence(words: &[&str]) -> Sentence {
		words.iter().map(|w| w.to_string()).collect()
	}

	fn corpus() -> Vec<Sentence> {
		vec![sentence(&["the", "cat", "sat"]), sentence(&["the", "dog", "ran"])]
	}

	fn trained(direction: Direction) -> BigramModel {
		let mut model = BigramModel::new(direction, Interpolation::default());
		model.train(&corpus()).unwrap();
		model
	}

	#[test]
	fn first_occurrence_is_counted_as_unknown() {
		let model = trained(Direction::Forward);
		// "the" is the only token seen twice, every other word went to <UNK>
		assert_eq!(model.unigram_prob("the"), Some(0.1));
		assert_eq!(model.unigram_prob(UNKNOWN), Some(0.5));
		assert_eq!(model.unigram_prob(START), Some(0.2));
		assert_eq!(model.unigram_prob(END), Some(0.2));
		assert_eq!(model.unigram_prob("cat"), None);
		assert_eq!(model.vocabulary_size(), 4);
		assert_eq!(model.token_count(), 10.0);
	}

	#[test]
	fn bigrams_are_conditioned_on_their_context() {
		let model = trained(Direction::Forward);
		assert_eq!(model.bigram_prob(START, UNKNOWN), Some(0.5));
		assert_eq!(model.bigram_prob(START, "the"), Some(0.5));
		assert_eq!(model.bigram_prob("the", UNKNOWN), Some(1.0));
		assert!((model.bigram_prob(UNKNOWN, UNKNOWN).unwrap() - 0.6).abs() < EPSILON);
		assert!((model.bigram_prob(UNKNOWN, END).unwrap() - 0.4).abs() < EPSILON);
		assert_eq!(model.bigram_prob("the", END), None);
	}

	#[test]
	fn backward_engine_conditions_on_the_following_token() {
		let model = trained(Direction::Backward);
		assert_eq!(model.bigram_prob(END, UNKNOWN), Some(1.0));
		assert!((model.bigram_prob(UNKNOWN, "the").unwrap() - 0.2).abs() < EPSILON);
		assert_eq!(model.bigram_prob("the", START), Some(1.0));
	}

	#[test]
	fn unigram_probabilities_sum_to_one() {
		for direction in [Direction::Forward, Direction::Backward] {
			let model = trained(direction);
			let total: f64 = model.unigram_probs().map(|(_, p)| p).sum();
			assert!((total - 1.0).abs() < 1e-9, "{direction}: {total}");
		}
	}

	#[test]
	fn bigram_distributions_are_normalized_per_context() {
		let model = trained(Direction::Forward);
		for context in model.bigrams.keys() {
			let total = model.bigrams[context].total();
			assert!((total - 1.0).abs() < 1e-9, "{context}: {total}");
		}
	}

	#[test]
	fn second_calculate_probs_is_rejected() {
		let mut model = trained(Direction::Forward);
		let before = model.unigram_prob("the");
		assert!(matches!(model.calculate_probs(), Err(LmError::AlreadyNormalized)));
		assert_eq!(model.unigram_prob("the"), before);
	}

	#[test]
	fn training_after_probabilities_is_rejected() {
		let mut model = trained(Direction::Forward);
		assert!(matches!(model.train(&corpus()), Err(LmError::AlreadyTrained)));
		assert!(matches!(
			model.train_sentence(&sentence(&["again"])),
			Err(LmError::AlreadyTrained)
		));
	}

	#[test]
	fn scoring_requires_probabilities() {
		let mut model = BigramModel::new(Direction::Forward, Interpolation::default());
		model.train_sentence(&sentence(&["a", "b"])).unwrap();
		assert!(matches!(model.sentence_log_prob(&sentence(&["a"])), Err(LmError::NotTrained)));
		assert_eq!(model.unigram_prob(START), None);
	}

	#[test]
	fn empty_corpus_is_rejected() {
		let mut model = BigramModel::new(Direction::Forward, Interpolation::default());
		assert!(matches!(model.train(&[]), Err(LmError::EmptyCorpus)));
		assert!(matches!(model.calculate_probs(), Err(LmError::EmptyCorpus)));
	}

	#[test]
	fn token_probs_follow_traversal_order() {
		let model = trained(Direction::Forward);
		let probs = model.sentence_token_probs(&sentence(&["the", "cat", "ran"])).unwrap();
		let expected = [0.46, 0.95, 0.59, 0.38];
		assert_eq!(probs.len(), expected.len());
		for (p, e) in probs.iter().zip(expected) {
			assert!((p - e).abs() < EPSILON, "{p} != {e}");
		}

		let model = trained(Direction::Backward);
		let probs = model.sentence_token_probs(&sentence(&["the", "cat", "ran"])).unwrap();
		let expected = [0.95, 0.59, 0.19, 0.92];
		for (p, e) in probs.iter().zip(expected) {
			assert!((p - e).abs() < EPSILON, "{p} != {e}");
		}
	}

	#[test]
	fn interpolated_prob_is_positive_for_known_tokens() {
		let model = trained(Direction::Forward);
		for (token, unigram) in model.unigram_probs() {
			let bigram = model.bigram_prob("not-a-context", token);
			assert!(model.interpolated_prob(unigram, bigram) > 0.0);
		}
	}

	#[test]
	fn log_prob2_drops_only_the_end_anchor() {
		let model = trained(Direction::Forward);
		let s = sentence(&["the", "cat", "ran"]);
		let full = model.sentence_log_prob(&s).unwrap();
		let partial = model.sentence_log_prob2(&s).unwrap();
		assert!((full - partial - 0.38f64.ln()).abs() < EPSILON);
	}

	#[test]
	fn empty_sentence_only_predicts_the_end_anchor() {
		let model = trained(Direction::Forward);
		let probs = model.sentence_token_probs(&[]).unwrap();
		assert_eq!(probs.len(), 1);
		assert_eq!(model.sentence_log_prob2(&[]).unwrap(), 0.0);
	}
}
