use std::collections::HashMap;

/// Mutable mapping from a token to a frequency, later to a probability.
///
/// A `CountTable` is used both for unigram counts (token → count) and for
/// the outgoing transitions of a single bigram context (next token → count).
///
/// ## Responsibilities:
/// - Register tokens with a zero count (seen but not counted)
/// - Accumulate occurrences during training
/// - Convert counts to probabilities in place (`scale`)
/// - Drop placeholders that were never counted (`retain_observed`)
///
/// ## Invariants
/// - Values are never negative
#[derive(Clone, Debug, Default)]
pub struct CountTable {
	/// Example: { "the" => 42.0, "<UNK>" => 3.0 }
	values: HashMap<String, f64>,
}

impl CountTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self { values: HashMap::new() }
	}

	/// Registers `token` with a zero value if it is absent.
	///
	/// Returns `true` if the token was not known before this call.
	pub fn register(&mut self, token: &str) -> bool {
		if self.values.contains_key(token) {
			return false;
		}
		self.values.insert(token.to_owned(), 0.0);
		true
	}

	/// Records one more occurrence of `token`, creating it if needed.
	pub fn increment(&mut self, token: &str) {
		*self.values.entry(token.to_owned()).or_insert(0.0) += 1.0;
	}

	/// Returns the value stored for `token`, if any.
	pub fn get(&self, token: &str) -> Option<f64> {
		self.values.get(token).copied()
	}

	pub fn contains(&self, token: &str) -> bool {
		self.values.contains_key(token)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Sum of all stored values.
	pub fn total(&self) -> f64 {
		self.values.values().sum()
	}

	/// Iterates over `(token, value)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
		self.values.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// Divides every value by `denominator`.
	///
	/// The caller guarantees `denominator > 0`.
	pub fn scale(&mut self, denominator: f64) {
		for value in self.values.values_mut() {
			*value /= denominator;
		}
	}

	/// Removes every zero-valued entry and returns how many were removed.
	pub fn retain_observed(&mut self) -> usize {
		let before = self.values.len();
		self.values.retain(|_, value| *value > 0.0);
		before - self.values.len()
	}
}
