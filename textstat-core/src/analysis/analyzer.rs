use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, warn};

use crate::ingest::Document;
use super::frequency::{top_n, FrequencyTable};
use super::ngram::NGramGenerator;
use super::report::{AnalysisReport, RankedItem, Section, SectionResult};
use super::request::{AnalysisKind, AnalysisRequest};
use super::tokenizer::{Language, StopwordSet, Tokenizer};
use super::AnalysisError;

/// Largest n-gram window offered by the façade (quadrigrams).
pub const MAX_WINDOW: usize = 4;

/// Output of `Analyzer::word_frequency`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordFrequency {
	/// Most frequent filtered tokens, count descending.
	pub ranked: Vec<RankedItem>,
	/// Every filtered token joined by a single space, for the word cloud.
	pub cloud_source: String,
}

/// Entry point of the analysis pipeline.
///
/// An `Analyzer` holds the stopword set of one language; everything else is
/// computed fresh on each call, so a single instance can serve any number of
/// documents and is safe to share.
///
/// # Responsibilities
/// - Word frequency plus the word-cloud source string
/// - N-gram frequency for windows 1 to `MAX_WINDOW`
/// - Word length distribution (alphabetic filter only, stopwords kept)
/// - Running a whole `AnalysisRequest` into an `AnalysisReport`
#[derive(Clone, Debug)]
pub struct Analyzer {
	language: Language,
	tokenizer: Tokenizer,
}

impl Analyzer {
	/// Creates an analyzer filtering with the stopwords of `language`.
	pub fn new(language: Language) -> Self {
		Self { language, tokenizer: Tokenizer::new(language) }
	}

	/// Creates an analyzer with a custom stopword set.
	///
	/// `language` is only reported back in `AnalysisReport::language`.
	pub fn with_stopwords(language: Language, stopwords: Arc<StopwordSet>) -> Self {
		Self { language, tokenizer: Tokenizer::with_stopwords(stopwords) }
	}

	pub fn language(&self) -> Language {
		self.language
	}

	pub fn tokenizer(&self) -> &Tokenizer {
		&self.tokenizer
	}

	/// Ranks filtered tokens and builds the word-cloud source.
	pub fn word_frequency(&self, document: &str, top_n: usize) -> WordFrequency {
		let tokens = self.tokenizer.filter_tokens(document);
		debug!("word frequency over {} filtered tokens", tokens.len());
		WordFrequency { ranked: rank_words(&tokens, top_n), cloud_source: tokens.join(" ") }
	}

	/// Ranks the n-grams of size `window` built from the filtered tokens.
	///
	/// Labels are the n-gram tokens joined by a single space.
	///
	/// # Errors
	/// Returns an error if `window` is not within `1..=MAX_WINDOW`.
	pub fn ngram_frequency(&self, document: &str, window: usize, top_n: usize) -> Result<Vec<RankedItem>, AnalysisError> {
		let generator = checked_window(window)?;
		let tokens = self.tokenizer.filter_tokens(document);
		debug!("{}-gram frequency over {} filtered tokens", window, tokens.len());
		Ok(rank_ngrams(&tokens, generator, top_n))
	}

	/// Counts tokens per character length.
	///
	/// Only the alphabetic filter applies here: stopwords are counted too.
	pub fn word_length_distribution(&self, document: &str) -> BTreeMap<usize, usize> {
		length_histogram(&self.tokenizer.alphabetic_tokens(document))
	}

	/// Runs every analysis of `request` over `document`, in request order.
	///
	/// The filtered and the alphabetic token sequences are computed at most
	/// once per call and shared by all sections.
	///
	/// # Notes
	/// - `request.language` is expected to match `self.language()`; the
	///   caller picks the analyzer, this method always uses its own stopwords.
	pub fn run(&self, request: &AnalysisRequest, document: &Document) -> AnalysisReport {
		if request.language != self.language {
			warn!("request asks for {} but analyzer filters {}", request.language, self.language);
		}

		let filtered = OnceCell::new();
		let alphabetic = OnceCell::new();
		let filtered_tokens = || filtered.get_or_init(|| self.tokenizer.filter_tokens(document.text()));
		let alphabetic_tokens = || alphabetic.get_or_init(|| self.tokenizer.alphabetic_tokens(document.text()));

		let top_n = request.top_n();
		let mut report = AnalysisReport { language: self.language, top_n, ..Default::default() };

		for &kind in request.kinds() {
			let result = match kind.ngram_generator() {
				Some(generator) => SectionResult::Ranked(rank_ngrams(filtered_tokens(), generator, top_n)),
				None if kind == AnalysisKind::LengthDistribution => {
					SectionResult::Histogram(length_histogram(alphabetic_tokens()))
				}
				None => SectionResult::WordCloud { source: filtered_tokens().join(" ") },
			};
			report.sections.push(Section { kind, result });
		}

		report.token_count = filtered_tokens().len();
		debug!(
			"analysis done: {} sections, {} filtered tokens, {} characters",
			report.sections.len(),
			report.token_count,
			document.char_count()
		);
		report
	}
}

fn checked_window(window: usize) -> Result<NGramGenerator, AnalysisError> {
	if !(1..=MAX_WINDOW).contains(&window) {
		return Err(AnalysisError::UnsupportedWindow { got: window, max: MAX_WINDOW });
	}
	NGramGenerator::new(window)
}

fn rank_words(tokens: &[String], n: usize) -> Vec<RankedItem> {
	top_n(tokens.iter().map(String::as_str), n)
		.into_iter()
		.map(|(word, count)| RankedItem::new(word, count))
		.collect()
}

fn rank_ngrams(tokens: &[String], generator: NGramGenerator, n: usize) -> Vec<RankedItem> {
	top_n(generator.generate(tokens), n)
		.into_iter()
		.map(|(gram, count)| RankedItem::new(gram.label(), count))
		.collect()
}

fn length_histogram(tokens: &[String]) -> BTreeMap<usize, usize> {
	FrequencyTable::from_items(tokens.iter().map(|token| token.chars().count()))
		.ranked()
		.into_iter()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const CATS: &str = "O gato e o cão correm. O gato dorme.";

	fn analyzer() -> Analyzer {
		Analyzer::with_stopwords(Language::Portuguese, Arc::new(StopwordSet::from_list(&["o", "e"])))
	}

	fn pairs(items: &[RankedItem]) -> Vec<(&str, usize)> {
		items.iter().map(|item| (item.label.as_str(), item.count)).collect()
	}

	#[test]
	fn test_word_frequency_scenario() {
		let result = analyzer().word_frequency(CATS, 1);
		assert_eq!(pairs(&result.ranked), vec![("gato", 2)]);
		assert_eq!(result.cloud_source, "gato cão correm gato dorme");

		let result = analyzer().word_frequency(CATS, 2);
		assert_eq!(pairs(&result.ranked), vec![("gato", 2), ("cão", 1)]);
	}

	#[test]
	fn test_top_n_length_is_bounded() {
		let analyzer = analyzer();
		for k in 0..8 {
			let ranked = analyzer.word_frequency(CATS, k).ranked;
			assert_eq!(ranked.len(), k.min(4));
		}
	}

	#[test]
	fn test_ngram_frequency() {
		let bigrams = analyzer().ngram_frequency(CATS, 2, 2).unwrap();
		assert_eq!(pairs(&bigrams), vec![("gato cão", 1), ("cão correm", 1)]);

		let unigrams = analyzer().ngram_frequency(CATS, 1, 20).unwrap();
		let words = analyzer().word_frequency(CATS, 20).ranked;
		assert_eq!(unigrams, words);
	}

	#[test]
	fn test_ngram_skips_removed_stopwords() {
		// "e" and "o" are gone before windowing, so "gato" pairs with "cão"
		let bigrams = analyzer().ngram_frequency("gato e o cão", 2, 5).unwrap();
		assert_eq!(pairs(&bigrams), vec![("gato cão", 1)]);
	}

	#[test]
	fn test_ngram_window_bounds() {
		let analyzer = analyzer();
		assert_eq!(
			analyzer.ngram_frequency(CATS, 5, 20),
			Err(AnalysisError::UnsupportedWindow { got: 5, max: MAX_WINDOW })
		);
		assert!(analyzer.ngram_frequency(CATS, 0, 20).is_err());
		assert!(analyzer.ngram_frequency(CATS, 4, 20).is_ok());
	}

	#[test]
	fn test_length_distribution_keeps_stopwords() {
		let histogram = analyzer().word_length_distribution("O gato e o cão 42");
		let expected: BTreeMap<usize, usize> = [(1, 3), (3, 1), (4, 1)].into_iter().collect();
		assert_eq!(histogram, expected);
	}

	#[test]
	fn test_elision_leaves_no_fragment() {
		let analyzer = analyzer();
		assert_eq!(analyzer.tokenizer().filter_tokens("copo d'água"), vec!["copo", "água"]);

		let histogram = analyzer.word_length_distribution("copo d'água");
		let expected: BTreeMap<usize, usize> = [(4, 2)].into_iter().collect();
		assert_eq!(histogram, expected);
	}

	#[test]
	fn test_run_gives_every_ranked_section() {
		let report = analyzer().run(&AnalysisRequest::new(AnalysisKind::ALL), &Document::from_text(CATS));
		assert!(report.warnings.is_empty());
		for kind in AnalysisKind::ALL {
			let ranked = matches!(report.section(kind), Some(SectionResult::Ranked(_)));
			assert_eq!(ranked, kind.window_size().is_some(), "{kind:?}");
		}
	}

	#[test]
	fn test_lengths_count_chars_not_bytes() {
		let histogram = analyzer().word_length_distribution("ação");
		assert_eq!(histogram.get(&4), Some(&1));
	}

	#[test]
	fn test_empty_document() {
		let analyzer = analyzer();
		assert_eq!(analyzer.word_frequency("", 20), WordFrequency::default());
		assert!(analyzer.ngram_frequency("", 3, 20).unwrap().is_empty());
		assert!(analyzer.word_length_distribution("").is_empty());
	}

	#[test]
	fn test_run_keeps_request_order() {
		let request = AnalysisRequest::new([
			AnalysisKind::LengthDistribution,
			AnalysisKind::Bigrams,
			AnalysisKind::WordCloud,
		])
		.with_top_n(3)
		.unwrap();
		let report = analyzer().run(&request, &Document::from_text(CATS));

		let kinds: Vec<AnalysisKind> = report.sections.iter().map(|s| s.kind).collect();
		assert_eq!(kinds, request.kinds());
		assert_eq!(report.token_count, 5);
		assert_eq!(report.top_n, 3);
		assert!(report.warnings.is_empty());
		assert_eq!(
			report.section(AnalysisKind::WordCloud),
			Some(&SectionResult::WordCloud { source: "gato cão correm gato dorme".to_owned() })
		);
		match report.section(AnalysisKind::Bigrams) {
			Some(SectionResult::Ranked(items)) => assert_eq!(items.len(), 3),
			other => panic!("unexpected bigram section: {other:?}"),
		}
	}

	#[test]
	fn test_run_is_deterministic() {
		let request = AnalysisRequest::new(AnalysisKind::ALL);
		let document = Document::from_text(CATS);
		let analyzer = analyzer();
		assert_eq!(analyzer.run(&request, &document), analyzer.run(&request, &document));
	}

	#[test]
	fn test_run_on_empty_document() {
		let report = analyzer().run(&AnalysisRequest::new(AnalysisKind::ALL), &Document::empty());
		assert_eq!(report.sections.len(), AnalysisKind::ALL.len());
		assert!(report.is_empty());
		assert_eq!(report.token_count, 0);
	}
}
