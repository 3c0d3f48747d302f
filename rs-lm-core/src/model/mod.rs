//! Top-level module for the bigram language models.
//!
//! This module provides:
//! - A frequency table (`CountTable`)
//! - A bigram engine parameterised by traversal direction (`BigramModel`)
//! - Forward, backward and bidirectional models (`ForwardModel`,
//!   `BackwardModel`, `BidirectionalModel`)
//! - The shared `LanguageModel` trait and corpus `Evaluation`

/// Token and token-pair frequency tables.
pub mod count_table;

/// Traversal direction, sentinels and the `<UNK>` token.
pub mod direction;

/// Interpolated bigram engine shared by both directional models.
///
/// Handles count accumulation, `<UNK>` substitution, the one-shot
/// count-to-probability conversion and sentence scoring.
pub mod bigram_model;

/// Left-to-right model.
pub mod forward_model;

/// Right-to-left model, a reversal adapter over the shared engine.
pub mod backward_model;

/// Fusion of a forward and a backward model.
pub mod bidirectional_model;

/// Train / score / test surface shared by every model.
pub mod language_model;

/// Corpus log probability and perplexity.
pub mod evaluation;

/// Interpolation and fusion weights.
pub mod weights;

/// An ordered sequence of tokens, without sentinels.
pub type Sentence = Vec<String>;
