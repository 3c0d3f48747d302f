use std::panic;
use std::thread;

use super::backward_model::BackwardModel;
use super::forward_model::ForwardModel;
use super::language_model::LanguageModel;
use super::weights::{FusionWeights, Interpolation};
use super::Sentence;
use crate::error::{LmError, Result};

/// Combination of a forward and a backward bigram model.
///
/// Both sub-models are trained independently on the same corpus. Each
/// sentence token gets a weighted mix of its forward and backward
/// probabilities. The sentence boundary is estimated twice (forward model
/// predicting `</S>`, backward model predicting `<S>`); both estimates
/// describe the same event and are averaged rather than mixed.
///
/// # Invariants
/// - Sub-models share no state and are never mutated after training
#[derive(Clone, Debug)]
pub struct BidirectionalModel {
	forward: ForwardModel,
	backward: BackwardModel,
	weights: FusionWeights,
}

impl BidirectionalModel {
	/// Default interpolation for both directions, 0.5 / 0.5 fusion.
	pub fn new() -> Self {
		Self::with_config(Interpolation::default(), FusionWeights::default())
	}

	pub fn with_config(interpolation: Interpolation, weights: FusionWeights) -> Self {
		Self {
			forward: ForwardModel::with_interpolation(interpolation),
			backward: BackwardModel::with_interpolation(interpolation),
			weights,
		}
	}

	pub fn forward(&self) -> &ForwardModel {
		&self.forward
	}

	pub fn backward(&self) -> &BackwardModel {
		&self.backward
	}

	pub fn weights(&self) -> FusionWeights {
		self.weights
	}
}

impl Default for BidirectionalModel {
	fn default() -> Self {
		Self::new()
	}
}

/// Aligns forward and backward probabilities and fuses them.
///
/// For a sentence of `n` tokens both inputs must hold `n + 1` values:
/// - `forward`: `w1 .. wn` then `</S>`
/// - `backward`: `wn .. w1` then `<S>`
///
/// The output holds `n + 2` values: `<S>` (backward), the `n` fused tokens,
/// then `</S>` (forward).
///
/// # Errors
/// Returns `SequenceLengthMismatch` if either input does not hold `n + 1`
/// values, nothing is fused in that case.
fn fuse(forward: &[f64], backward: &[f64], sentence_len: usize, weights: FusionWeights) -> Result<Vec<f64>> {
	let len = sentence_len + 1;
	if forward.len() != len || backward.len() != len {
		return Err(LmError::SequenceLengthMismatch {
			expected: len,
			forward: forward.len(),
			backward: backward.len(),
		});
	}

	let mut probs = Vec::with_capacity(len + 1);
	probs.push(backward[len - 1]);
	for i in 1..len {
		probs.push(weights.fuse(forward[i - 1], backward[len - i - 1]));
	}
	probs.push(forward[len - 1]);
	Ok(probs)
}

/// Sum of the log probabilities of the fused tokens, boundaries excluded.
fn interior_log_prob(probs: &[f64]) -> f64 {
	probs[1..probs.len() - 1].iter().map(|p| p.ln()).sum()
}

impl LanguageModel for BidirectionalModel {
	fn name(&self) -> &'static str {
		"bidirectional"
	}

	/// Trains the backward model on a scoped thread while the forward
	/// model trains on the calling one.
	fn train(&mut self, sentences: &[Sentence]) -> Result<()> {
		let forward = &mut self.forward;
		let backward = &mut self.backward;

		let (forward_result, backward_result) = thread::scope(|scope| {
			let handle = scope.spawn(move || backward.train(sentences));
			let forward_result = forward.train(sentences);
			let backward_result = handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload));
			(forward_result, backward_result)
		});

		forward_result?;
		backward_result
	}

	/// Interior tokens plus the log of the averaged boundary probability.
	fn sentence_log_prob(&self, sentence: &[String]) -> Result<f64> {
		let probs = self.sentence_token_probs(sentence)?;
		let boundary = (probs[0] + probs[probs.len() - 1]) / 2.0;
		Ok(interior_log_prob(&probs) + boundary.ln())
	}

	fn sentence_log_prob2(&self, sentence: &[String]) -> Result<f64> {
		let probs = self.sentence_token_probs(sentence)?;
		Ok(interior_log_prob(&probs))
	}

	/// `[P(<S>), P(w1), ..., P(wn), P(</S>)]`
	fn sentence_token_probs(&self, sentence: &[String]) -> Result<Vec<f64>> {
		let forward = self.forward.sentence_token_probs(sentence)?;
		let backward = self.backward.sentence_token_probs(sentence)?;
		fuse(&forward, &backward, sentence.len(), self.weights)
	}
}
