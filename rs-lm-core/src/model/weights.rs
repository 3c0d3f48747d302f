use serde::{Deserialize, Serialize};

use crate::error::{LmError, Result};

/// Accepted distance between the weight sum and 1.0.
const SUM_TOLERANCE: f64 = 1e-9;

/// Checks that `(first, second)` is a convex combination.
fn check_convex(first: (&str, f64), second: (&str, f64)) -> Result<()> {
	for (name, value) in [first, second] {
		if !value.is_finite() || !(0.0..=1.0).contains(&value) {
			return Err(LmError::InvalidWeights(format!(
				"{name} must be between 0.0 and 1.0, got {value}"
			)));
		}
	}
	if (first.1 + second.1 - 1.0).abs() > SUM_TOLERANCE {
		return Err(LmError::InvalidWeights(format!(
			"{} + {} must sum to 1.0, got {}",
			first.0,
			second.0,
			first.1 + second.1
		)));
	}
	Ok(())
}

/// Linear interpolation of the unigram and bigram estimates.
///
/// # Invariants
/// - Both weights lie in `[0, 1]` and sum to 1
/// - `unigram_weight > 0`, so any in-vocabulary token gets a non-zero probability
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(try_from = "RawInterpolation")]
pub struct Interpolation {
	unigram_weight: f64,
	bigram_weight: f64,
}

impl Interpolation {
	/// Creates an interpolation from explicit weights.
	///
	/// # Errors
	/// Returns `InvalidWeights` if the weights are not a convex combination
	/// or if the unigram weight is zero.
	pub fn new(unigram_weight: f64, bigram_weight: f64) -> Result<Self> {
		check_convex(("unigram_weight", unigram_weight), ("bigram_weight", bigram_weight))?;
		if unigram_weight <= 0.0 {
			return Err(LmError::InvalidWeights(
				"unigram_weight must be strictly positive".to_owned(),
			));
		}
		Ok(Self { unigram_weight, bigram_weight })
	}

	/// Creates an interpolation whose bigram weight is `1 - unigram_weight`.
	pub fn from_unigram_weight(unigram_weight: f64) -> Result<Self> {
		Self::new(unigram_weight, 1.0 - unigram_weight)
	}

	pub fn unigram_weight(&self) -> f64 {
		self.unigram_weight
	}

	pub fn bigram_weight(&self) -> f64 {
		self.bigram_weight
	}

	/// Combines a unigram probability with an optional bigram probability.
	///
	/// An absent bigram contributes 0.
	pub fn interpolate(&self, unigram: f64, bigram: Option<f64>) -> f64 {
		self.unigram_weight * unigram + self.bigram_weight * bigram.unwrap_or(0.0)
	}
}

impl Default for Interpolation {
	fn default() -> Self {
		Self { unigram_weight: 0.1, bigram_weight: 0.9 }
	}
}

/// Unchecked form read by serde, validated through [`Interpolation::new`].
#[derive(Deserialize)]
struct RawInterpolation {
	unigram_weight: f64,
	bigram_weight: f64,
}

impl TryFrom<RawInterpolation> for Interpolation {
	type Error = LmError;

	fn try_from(raw: RawInterpolation) -> Result<Self> {
		Self::new(raw.unigram_weight, raw.bigram_weight)
	}
}

/// Weights used by the bidirectional model to mix both directions.
///
/// # Invariants
/// - Both weights lie in `[0, 1]` and sum to 1
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(try_from = "RawFusionWeights")]
pub struct FusionWeights {
	forward_weight: f64,
	backward_weight: f64,
}

impl FusionWeights {
	/// # Errors
	/// Returns `InvalidWeights` if the weights are not a convex combination.
	pub fn new(forward_weight: f64, backward_weight: f64) -> Result<Self> {
		check_convex(("forward_weight", forward_weight), ("backward_weight", backward_weight))?;
		Ok(Self { forward_weight, backward_weight })
	}

	/// Creates fusion weights whose backward weight is `1 - forward_weight`.
	pub fn from_forward_weight(forward_weight: f64) -> Result<Self> {
		Self::new(forward_weight, 1.0 - forward_weight)
	}

	pub fn forward_weight(&self) -> f64 {
		self.forward_weight
	}

	pub fn backward_weight(&self) -> f64 {
		self.backward_weight
	}

	/// Weighted mix of a forward and a backward estimate of the same token.
	pub fn fuse(&self, forward: f64, backward: f64) -> f64 {
		self.forward_weight * forward + self.backward_weight * backward
	}
}

impl Default for FusionWeights {
	fn default() -> Self {
		Self { forward_weight: 0.5, backward_weight: 0.5 }
	}
}

#[derive(Deserialize)]
struct RawFusionWeights {
	forward_weight: f64,
	backward_weight: f64,
}

impl TryFrom<RawFusionWeights> for FusionWeights {
	type Error = LmError;

	fn try_from(raw: RawFusionWeights) -> Result<Self> {
		Self::new(raw.forward_weight, raw.backward_weight)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid_combinations() {
		let interpolation = Interpolation::default();
		assert_eq!(Interpolation::new(0.1, 0.9).unwrap(), interpolation);
		let weights = FusionWeights::default();
		assert_eq!(FusionWeights::from_forward_weight(0.5).unwrap(), weights);
	}

	#[test]
	fn rejects_weights_that_do_not_sum_to_one() {
		assert!(matches!(Interpolation::new(0.5, 0.6), Err(LmError::InvalidWeights(_))));
		assert!(matches!(FusionWeights::new(0.2, 0.2), Err(LmError::InvalidWeights(_))));
	}

	#[test]
	fn rejects_out_of_range_and_non_finite_weights() {
		assert!(Interpolation::new(-0.5, 1.5).is_err());
		assert!(FusionWeights::new(f64::NAN, 0.5).is_err());
		assert!(FusionWeights::from_forward_weight(1.2).is_err());
	}

	#[test]
	fn unigram_weight_must_be_positive() {
		assert!(Interpolation::new(0.0, 1.0).is_err());
		assert!(Interpolation::from_unigram_weight(1.0).is_ok());
	}

	#[test]
	fn one_sided_fusion_is_allowed() {
		let weights = FusionWeights::new(1.0, 0.0).unwrap();
		assert_eq!(weights.fuse(0.25, 0.75), 0.25);
	}

	#[test]
	fn missing_bigram_falls_back_to_unigram_share() {
		let interpolation = Interpolation::default();
		assert!((interpolation.interpolate(0.5, None) - 0.05).abs() < 1e-12);
		assert!((interpolation.interpolate(0.5, Some(1.0)) - 0.95).abs() < 1e-12);
	}

	#[test]
	fn deserializing_goes_through_validation() {
		let interpolation: Interpolation =
			serde_json::from_str(r#"{"unigram_weight":0.25,"bigram_weight":0.75}"#).unwrap();
		assert_eq!(interpolation, Interpolation::new(0.25, 0.75).unwrap());
		let weights: FusionWeights =
			serde_json::from_str(&serde_json::to_string(&FusionWeights::default()).unwrap()).unwrap();
		assert_eq!(weights, FusionWeights::default());

		let error = serde_json::from_str::<Interpolation>(r#"{"unigram_weight":0.5,"bigram_weight":0.6}"#)
			.unwrap_err();
		assert!(error.to_string().contains("must sum to 1.0"));
		assert!(serde_json::from_str::<Interpolation>(r#"{"unigram_weight":0.0,"bigram_weight":1.0}"#).is_err());
		assert!(serde_json::from_str::<FusionWeights>(r#"{"forward_weight":1.5,"backward_weight":-0.5}"#).is_err());
	}
}
