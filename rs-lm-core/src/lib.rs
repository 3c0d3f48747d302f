//! Bigram language modelling library.
//!
//! This crate estimates the probability of word sequences with
//! interpolated unigram/bigram models, including:
//! - Forward (left-to-right) and backward (right-to-left) models
//! - A bidirectional model fusing both directions
//! - Corpus perplexity evaluation
//! - Loading of part-of-speech tagged corpora and train/test splitting
//!
//! Models are trained once, in a single batch, then queried read-only.

/// Language models and their evaluation.
pub mod model;

/// Loading and splitting of POS-tagged corpora.
pub mod corpus;

/// Crate-wide error type.
pub mod error;

/// File helpers used by the corpus loader.
///
/// Not exposed
pub(crate) mod io;

pub use error::{LmError, Result};
