use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ngram::NGramGenerator;
use super::tokenizer::Language;
use super::AnalysisError;

/// Smallest accepted top N.
pub const MIN_TOP_N: usize = 1;
/// Largest accepted top N.
pub const MAX_TOP_N: usize = 100;
/// Top N used when the caller does not choose one.
pub const DEFAULT_TOP_N: usize = 20;

/// The analyses a caller can ask for.
///
/// # Variants
/// - `WordCloud`: space-joined filtered tokens for a word-cloud renderer.
/// - `Words`, `Bigrams`, `Trigrams`, `Quadrigrams`: ranked n-grams of
///   size 1 to 4.
/// - `LengthDistribution`: histogram of token lengths (stopwords included).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
	WordCloud,
	Words,
	Bigrams,
	Trigrams,
	Quadrigrams,
	LengthDistribution,
}

impl AnalysisKind {
	/// Every kind, in the order they are offered to the user.
	pub const ALL: [AnalysisKind; 6] = [
		AnalysisKind::WordCloud,
		AnalysisKind::Words,
		AnalysisKind::Bigrams,
		AnalysisKind::Trigrams,
		AnalysisKind::Quadrigrams,
		AnalysisKind::LengthDistribution,
	];

	/// N-gram window for the ranked kinds, `None` otherwise.
	pub fn window_size(self) -> Option<usize> {
		match self {
			AnalysisKind::Words => Some(1),
			AnalysisKind::Bigrams => Some(2),
			AnalysisKind::Trigrams => Some(3),
			AnalysisKind::Quadrigrams => Some(4),
			AnalysisKind::WordCloud | AnalysisKind::LengthDistribution => None,
		}
	}

	/// N-gram generator for the ranked kinds, `None` otherwise.
	pub fn ngram_generator(self) -> Option<NGramGenerator> {
		self.window_size().and_then(NonZeroUsize::new).map(NGramGenerator::from_window)
	}

	/// Wire name (`"word_cloud"`, `"bigrams"`, ...).
	pub fn name(self) -> &'static str {
		match self {
			AnalysisKind::WordCloud => "word_cloud",
			AnalysisKind::Words => "words",
			AnalysisKind::Bigrams => "bigrams",
			AnalysisKind::Trigrams => "trigrams",
			AnalysisKind::Quadrigrams => "quadrigrams",
			AnalysisKind::LengthDistribution => "length_distribution",
		}
	}

	/// Title shown above the section.
	pub fn label(self) -> &'static str {
		match self {
			AnalysisKind::WordCloud => "Word Cloud",
			AnalysisKind::Words => "Top Words",
			AnalysisKind::Bigrams => "Top Bigrams",
			AnalysisKind::Trigrams => "Top Trigrams",
			AnalysisKind::Quadrigrams => "Top Quadrigrams",
			AnalysisKind::LengthDistribution => "Word Length Distribution",
		}
	}
}

impl FromStr for AnalysisKind {
	type Err = AnalysisError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim().to_lowercase();
		AnalysisKind::ALL
			.into_iter()
			.find(|kind| kind.name() == wanted)
			.ok_or_else(|| AnalysisError::UnknownAnalysis(s.to_owned()))
	}
}

impl fmt::Display for AnalysisKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Parses a comma-separated list of analysis names (`"words, bigrams"`).
///
/// Blank entries are skipped.
pub fn parse_kinds(list: &str) -> Result<Vec<AnalysisKind>, AnalysisError> {
	list.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::parse::<AnalysisKind>)
		.collect()
}

/// Everything one analysis run needs besides the document.
///
/// Replaces any session-wide state: the caller builds one per request and
/// hands it to `Analyzer::run`.
///
/// # Invariants
/// - `kinds` holds no duplicates and keeps the order they were requested in
/// - `top_n` is within `MIN_TOP_N..=MAX_TOP_N`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
	kinds: Vec<AnalysisKind>,
	top_n: usize,
	/// Stopword language.
	pub language: Language,
}

impl Default for AnalysisRequest {
	fn default() -> Self {
		Self { kinds: Vec::new(), top_n: DEFAULT_TOP_N, language: Language::default() }
	}
}

impl AnalysisRequest {
	/// Creates a request for `kinds`, with default top N and language.
	///
	/// Duplicate kinds are dropped, the first occurrence wins.
	pub fn new<I: IntoIterator<Item = AnalysisKind>>(kinds: I) -> Self {
		let mut request = Self::default();
		for kind in kinds {
			request.add_kind(kind);
		}
		request
	}

	/// Appends `kind` unless it is already requested.
	pub fn add_kind(&mut self, kind: AnalysisKind) {
		if !self.kinds.contains(&kind) {
			self.kinds.push(kind);
		}
	}

	pub fn kinds(&self) -> &[AnalysisKind] {
		&self.kinds
	}

	pub fn top_n(&self) -> usize {
		self.top_n
	}

	/// Sets how many ranked items each section keeps.
	///
	/// # Errors
	/// Returns an error if the value is outside `MIN_TOP_N..=MAX_TOP_N`.
	pub fn set_top_n(&mut self, top_n: usize) -> Result<(), AnalysisError> {
		if !(MIN_TOP_N..=MAX_TOP_N).contains(&top_n) {
			return Err(AnalysisError::InvalidTopN { got: top_n, min: MIN_TOP_N, max: MAX_TOP_N });
		}
		self.top_n = top_n;
		Ok(())
	}

	/// Builder-style `set_top_n`.
	pub fn with_top_n(mut self, top_n: usize) -> Result<Self, AnalysisError> {
		self.set_top_n(top_n)?;
		Ok(self)
	}

	pub fn with_language(mut self, language: Language) -> Self {
		self.language = language;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_window_sizes() {
		assert_eq!(AnalysisKind::Words.window_size(), Some(1));
		assert_eq!(AnalysisKind::Bigrams.window_size(), Some(2));
		assert_eq!(AnalysisKind::Trigrams.window_size(), Some(3));
		assert_eq!(AnalysisKind::Quadrigrams.window_size(), Some(4));
		assert_eq!(AnalysisKind::WordCloud.window_size(), None);
		assert_eq!(AnalysisKind::LengthDistribution.window_size(), None);
	}

	#[test]
	fn test_ngram_generator_follows_window() {
		for kind in AnalysisKind::ALL {
			assert_eq!(kind.ngram_generator().map(|g| g.n()), kind.window_size());
		}
	}

	#[test]
	fn test_parse_kinds() {
		let kinds = parse_kinds("words, Bigrams,,length_distribution").unwrap();
		assert_eq!(kinds, vec![
			AnalysisKind::Words,
			AnalysisKind::Bigrams,
			AnalysisKind::LengthDistribution,
		]);
		assert_eq!(
			parse_kinds("words,pentagrams"),
			Err(AnalysisError::UnknownAnalysis("pentagrams".to_owned()))
		);
		assert!(parse_kinds("").unwrap().is_empty());
	}

	#[test]
	fn test_names_round_trip() {
		for kind in AnalysisKind::ALL {
			assert_eq!(kind.name().parse::<AnalysisKind>(), Ok(kind));
		}
	}

	#[test]
	fn test_serde_names_match() {
		let json = serde_json::to_string(&AnalysisKind::LengthDistribution).unwrap();
		assert_eq!(json, "\"length_distribution\"");
	}

	#[test]
	fn test_request_defaults_and_dedup() {
		let request = AnalysisRequest::new([
			AnalysisKind::Trigrams,
			AnalysisKind::Words,
			AnalysisKind::Trigrams,
		]);
		assert_eq!(request.kinds(), &[AnalysisKind::Trigrams, AnalysisKind::Words]);
		assert_eq!(request.top_n(), DEFAULT_TOP_N);
		assert_eq!(request.language, Language::Portuguese);
	}

	#[test]
	fn test_top_n_bounds() {
		let mut request = AnalysisRequest::default();
		assert!(request.set_top_n(0).is_err());
		assert!(request.set_top_n(101).is_err());
		assert_eq!(request.top_n(), DEFAULT_TOP_N);
		request.set_top_n(1).unwrap();
		request.set_top_n(100).unwrap();
		assert_eq!(request.top_n(), 100);
	}
}
