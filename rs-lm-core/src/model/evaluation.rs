use std::fmt;
use std::sync::mpsc;
use std::thread;

use log::debug;
use serde::Serialize;

use super::language_model::LanguageModel;
use super::Sentence;
use crate::error::{LmError, Result};

/// Below this many sentences, scoring stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 512;

/// Whether boundary predictions take part in an evaluation.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Boundaries {
	/// `test`: each sentence counts `len + 1` predictions
	Included,
	/// `test2`: each sentence counts `len` predictions
	Excluded,
}

/// Corpus-level scoring report.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
	pub boundaries: Boundaries,
	pub sentences: usize,
	/// Number of predictions the perplexity is averaged over.
	pub tokens: usize,
	/// Natural log probability of the whole corpus.
	pub log_prob: f64,
	/// `exp(-log_prob / tokens)`
	pub perplexity: f64,
}

impl fmt::Display for Evaluation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.boundaries {
			Boundaries::Included => write!(f, "Perplexity = {}", self.perplexity),
			Boundaries::Excluded => write!(f, "Word Perplexity = {}", self.perplexity),
		}
	}
}

fn score_chunk<M>(model: &M, sentences: &[Sentence], boundaries: Boundaries) -> Result<f64>
where
	M: LanguageModel + ?Sized,
{
	let mut log_prob = 0.0;
	for sentence in sentences {
		log_prob += match boundaries {
			Boundaries::Included => model.sentence_log_prob(sentence)?,
			Boundaries::Excluded => model.sentence_log_prob2(sentence)?,
		};
	}
	Ok(log_prob)
}

/// Scores a corpus and computes its perplexity.
///
/// # Behavior
/// - Small corpora are scored sequentially
/// - Larger ones are split into `cpus * 8` chunks scored on scoped threads,
///   partial sums are collected over a channel and added in chunk order
///
/// # Errors
/// - `EmptyCorpus` if there is no prediction to average over
/// - Any error raised while scoring a sentence
pub(crate) fn evaluate<M>(model: &M, sentences: &[Sentence], boundaries: Boundaries) -> Result<Evaluation>
where
	M: LanguageModel + ?Sized,
{
	let tokens: usize = sentences
		.iter()
		.map(|s| match boundaries {
			Boundaries::Included => s.len() + 1,
			Boundaries::Excluded => s.len(),
		})
		.sum();
	if tokens == 0 {
		return Err(LmError::EmptyCorpus);
	}

	let log_prob = if sentences.len() < PARALLEL_THRESHOLD {
		score_chunk(model, sentences, boundaries)?
	} else {
		let chunks = num_cpus::get() * 8;
		let chunk_size = sentences.len().div_ceil(chunks);
		debug!("Scoring {} sentences in chunks of {}", sentences.len(), chunk_size);

		let mut partials = thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for (index, chunk) in sentences.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				scope.spawn(move || {
					// The receiver outlives every sender inside the scope
					let _ = tx.send((index, score_chunk(model, chunk, boundaries)));
				});
			}
			drop(tx);
			rx.iter().collect::<Vec<_>>()
		});

		partials.sort_by_key(|(index, _)| *index);
		let mut total = 0.0;
		for (_, partial) in partials {
			total += partial?;
		}
		total
	};

	Ok(Evaluation {
		boundaries,
		sentences: sentences.len(),
		tokens,
		log_prob,
		perplexity: (-log_prob / tokens as f64).exp(),
	})
}
