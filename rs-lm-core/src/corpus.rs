//! Part-of-speech tagged corpus handling.
//!
//! The loader reads LDC-style POS files where each token is written as
//! `word/TAG`, optionally grouped in `[ ... ]` chunks, with `*x*` header
//! lines and `=====` separator lines. Tags are stripped, only words are kept.

use std::path::Path;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{LmError, Result};
use crate::io::{collect_files, read_file};
use crate::model::Sentence;

/// Tag marking the end of a sentence.
const SENTENCE_END_TAG: &str = ".";

/// Loads every sentence from the given files and directories.
///
/// Directories are walked recursively, files are read in sorted order so the
/// sentence order is reproducible.
///
/// # Errors
/// - `Io` if a path does not exist or cannot be read
/// - `MalformedToken` if a token has no `/TAG` part
pub fn convert_to_token_lists<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Sentence>> {
	let mut sentences = Vec::new();
	let mut file_count = 0;

	for path in paths {
		for file in collect_files(path)? {
			let lines = read_file(&file)?;
			let before = sentences.len();
			parse_tagged_lines(&lines, &file.display().to_string(), &mut sentences)?;
			debug!("{}: {} sentences", file.display(), sentences.len() - before);
			file_count += 1;
		}
	}

	info!("Loaded {} sentences from {} files", sentences.len(), file_count);
	Ok(sentences)
}

/// Parses tagged lines and appends the sentences found to `sentences`.
///
/// A sentence ends after a token tagged `.` or at a `=====` separator line,
/// a trailing sentence without either is kept as well.
pub fn parse_tagged_lines(lines: &[String], source_name: &str, sentences: &mut Vec<Sentence>) -> Result<()> {
	let mut sentence = Vec::new();

	for line in lines {
		let line = line.trim();
		if line.starts_with("*x*") {
			continue;
		}
		if line.starts_with("=====") {
			// Separators also close utterances that have no `./.`
			if !sentence.is_empty() {
				sentences.push(std::mem::take(&mut sentence));
			}
			continue;
		}

		for item in line.split_whitespace() {
			if item == "[" || item == "]" {
				continue;
			}
			let (word, tag) = split_tagged(item).ok_or_else(|| LmError::MalformedToken {
				source_name: source_name.to_owned(),
				token: item.to_owned(),
			})?;
			sentence.push(word);
			if tag == SENTENCE_END_TAG {
				sentences.push(std::mem::take(&mut sentence));
			}
		}
	}

	if !sentence.is_empty() {
		sentences.push(sentence);
	}
	Ok(())
}

/// Splits `word/TAG` at the last unescaped slash.
///
/// `\/` inside the word is unescaped, e.g. `1\/2/CD` → (`1/2`, `CD`).
fn split_tagged(item: &str) -> Option<(String, &str)> {
	let bytes = item.as_bytes();
	let index = (0..bytes.len())
		.rev()
		.find(|&i| bytes[i] == b'/' && (i == 0 || bytes[i - 1] != b'\\'))?;

	let (word, tag) = (&item[..index], &item[index + 1..]);
	if word.is_empty() || tag.is_empty() {
		return None;
	}
	Some((word.replace("\\/", "/"), tag))
}

/// Checks that a test fraction lies strictly between 0 and 1.
pub fn validate_test_fraction(test_fraction: f64) -> Result<()> {
	if test_fraction > 0.0 && test_fraction < 1.0 {
		Ok(())
	} else {
		Err(LmError::InvalidTestFraction(test_fraction))
	}
}

/// Splits a corpus into `(train, test)`.
///
/// The test part is the last `round(len * test_fraction)` sentences, the
/// training part is everything before it.
///
/// # Errors
/// - `InvalidTestFraction` unless `0 < test_fraction < 1`
/// - `EmptySplit` if either part would hold no sentence
pub fn split(sentences: &[Sentence], test_fraction: f64) -> Result<(&[Sentence], &[Sentence])> {
	validate_test_fraction(test_fraction)?;
	let num_test = (sentences.len() as f64 * test_fraction).round() as usize;
	let num_train = sentences.len() - num_test;
	if num_test == 0 || num_train == 0 {
		return Err(LmError::EmptySplit {
			sentences: sentences.len(),
			train: num_train,
			test: num_test,
		});
	}
	Ok(sentences.split_at(num_train))
}

/// Shuffles the corpus with a seeded generator, the same seed always gives
/// the same order.
pub fn shuffle(sentences: &mut [Sentence], seed: u64) {
	let mut rng = StdRng::seed_from_u64(seed);
	sentences.shuffle(&mut rng);
}

/// Total number of tokens in `sentences`, sentinels excluded.
pub fn word_count(sentences: &[Sentence]) -> usize {
	sentences.iter().map(Vec::len).sum()
}
