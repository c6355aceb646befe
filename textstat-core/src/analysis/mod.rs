//! Top-level module for the analysis pipeline.
//!
//! The pipeline is `tokenize → filter → count → rank`, with the n-gram
//! generator slotted between filtering and counting:
//! - Tokenization and stopword filtering (`Tokenizer`)
//! - Frequency counting and ranking (`FrequencyTable`)
//! - Sliding-window n-grams (`NGramGenerator`)
//! - Request and report types (`AnalysisRequest`, `AnalysisReport`)
//! - The façade composing all of the above (`Analyzer`)

use thiserror::Error;

/// Analysis façade.
///
/// Runs word frequency, n-gram frequency and word length distribution
/// over a document, alone or driven by an `AnalysisRequest`.
pub mod analyzer;

/// Occurrence counting with a stable rank order.
pub mod frequency;

/// Sliding-window word n-grams over the filtered token stream.
pub mod ngram;

/// Serializable results handed to the presentation layer.
pub mod report;

/// Explicit request object: which analyses, how many results, which language.
pub mod request;

/// Lowercasing, word segmentation and stopword filtering.
pub mod tokenizer;

/// Errors raised when an analysis is configured with invalid parameters.
///
/// Text content never produces an error; only out-of-range settings do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
	#[error("n-gram window must be >= 1")]
	EmptyWindow,

	#[error("n-gram window must be between 1 and {max}, got {got}")]
	UnsupportedWindow { got: usize, max: usize },

	#[error("top N must be between {min} and {max}, got {got}")]
	InvalidTopN { got: usize, min: usize, max: usize },

	#[error("unknown language: {0}")]
	UnknownLanguage(String),

	#[error("unknown analysis: {0}")]
	UnknownAnalysis(String),
}
