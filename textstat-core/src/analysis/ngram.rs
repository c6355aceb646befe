use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// An ordered tuple of consecutive tokens.
///
/// Equality and hashing are by content and order: `("a", "b")` and
/// `("b", "a")` are distinct n-grams.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NGram(Vec<String>);

impl NGram {
	pub fn new(tokens: Vec<String>) -> Self {
		Self(tokens)
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Tokens joined by a single space, for display.
	pub fn label(&self) -> String {
		self.0.join(" ")
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.label())
	}
}

/// Builds n-grams of a fixed size from a token stream.
///
/// # Notes
/// - The stream is treated as one flat sequence: windows run across
///   sentence and paragraph boundaries, and across stopwords removed
///   before generation. `"casa de pedra"` filtered to `["casa", "pedra"]`
///   yields the bigram `casa pedra`.
///
/// # Invariants
/// - `n` is always >= 1
/// - Every generated n-gram has exactly `n` tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NGramGenerator {
	n: usize, // must be >= 1
}

impl NGramGenerator {
	/// Creates a generator of window size `n`.
	///
	/// # Errors
	/// Returns an error if `n == 0`.
	pub fn new(n: usize) -> Result<Self, AnalysisError> {
		if n == 0 {
			return Err(AnalysisError::EmptyWindow);
		}
		Ok(Self { n })
	}

	/// Creates a generator from a window already known to be non-zero.
	pub fn from_window(n: NonZeroUsize) -> Self {
		Self { n: n.get() }
	}

	pub fn n(&self) -> usize {
		self.n
	}

	/// Every contiguous window of `n` tokens, sliding by one.
	///
	/// For `n == 1` each token becomes a one-element n-gram, so unigrams are
	/// counted the same way as longer n-grams. Streams shorter than `n`
	/// give no n-grams.
	pub fn generate<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<NGram> {
		if tokens.len() < self.n {
			// Stream too short, no n-grams to compute
			return Vec::new();
		}

		tokens
			.windows(self.n)
			.map(|window| NGram(window.iter().map(|t| t.as_ref().to_owned()).collect()))
			.collect()
	}
}

/// Shorthand for `NGramGenerator::new(n)?.generate(tokens)`.
pub fn make_ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Result<Vec<NGram>, AnalysisError> {
	Ok(NGramGenerator::new(n)?.generate(tokens))
}
