use std::fmt;
use std::iter::Rev;
use std::slice::Iter;

use serde::Serialize;

/// Sentence start sentinel.
pub const START: &str = "<S>";

/// Sentence end sentinel.
pub const END: &str = "</S>";

/// Stands for every token that was not seen during training.
pub const UNKNOWN: &str = "<UNK>";

/// Order in which a directional model walks through a sentence.
///
/// The direction decides both the traversal order and which sentinel
/// anchors each end:
/// - `Forward`: `<S>` is the initial context, `</S>` is predicted last
/// - `Backward`: `</S>` is the initial context, `<S>` is predicted last
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
	Forward,
	Backward,
}

impl Direction {
	/// Sentinel used as context before the first traversed token.
	pub fn start_anchor(self) -> &'static str {
		match self {
			Direction::Forward => START,
			Direction::Backward => END,
		}
	}

	/// Sentinel predicted after the last traversed token.
	pub fn end_anchor(self) -> &'static str {
		match self {
			Direction::Forward => END,
			Direction::Backward => START,
		}
	}

	/// Iterates over `sentence` in this direction without copying it.
	pub fn traverse(self, sentence: &[String]) -> Traversal<'_> {
		match self {
			Direction::Forward => Traversal::Forward(sentence.iter()),
			Direction::Backward => Traversal::Backward(sentence.iter().rev()),
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Direction::Forward => write!(f, "forward"),
			Direction::Backward => write!(f, "backward"),
		}
	}
}

/// Iterator returned by [`Direction::traverse`].
pub enum Traversal<'a> {
	Forward(Iter<'a, String>),
	Backward(Rev<Iter<'a, String>>),
}

impl<'a> Iterator for Traversal<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		match self {
			Traversal::Forward(iter) => iter.next().map(String::as_str),
			Traversal::Backward(iter) => iter.next().map(String::as_str),
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match self {
			Traversal::Forward(iter) => iter.size_hint(),
			Traversal::Backward(iter) => iter.size_hint(),
		}
	}
}

impl ExactSizeIterator for Traversal<'_> {}
