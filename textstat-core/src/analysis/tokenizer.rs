use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::AnalysisError;

/// Language whose stopword list is used when filtering tokens.
///
/// Parsed case-insensitively from either the ISO-639-1 code or the English
/// name (`"pt"`, `"Portuguese"`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
	#[default]
	#[serde(alias = "pt")]
	Portuguese,
	#[serde(alias = "en")]
	English,
	#[serde(alias = "es")]
	Spanish,
	#[serde(alias = "fr")]
	French,
	#[serde(alias = "de")]
	German,
	#[serde(alias = "it")]
	Italian,
	#[serde(alias = "nl")]
	Dutch,
	#[serde(alias = "ru")]
	Russian,
	#[serde(alias = "sv")]
	Swedish,
	#[serde(alias = "no")]
	Norwegian,
	#[serde(alias = "da")]
	Danish,
	#[serde(alias = "fi")]
	Finnish,
	#[serde(alias = "hu")]
	Hungarian,
	#[serde(alias = "tr")]
	Turkish,
}

impl Language {
	/// Every supported language, default first.
	pub const ALL: [Language; 14] = [
		Language::Portuguese,
		Language::English,
		Language::Spanish,
		Language::French,
		Language::German,
		Language::Italian,
		Language::Dutch,
		Language::Russian,
		Language::Swedish,
		Language::Norwegian,
		Language::Danish,
		Language::Finnish,
		Language::Hungarian,
		Language::Turkish,
	];

	/// ISO-639-1 code.
	pub fn code(self) -> &'static str {
		match self {
			Language::Portuguese => "pt",
			Language::English => "en",
			Language::Spanish => "es",
			Language::French => "fr",
			Language::German => "de",
			Language::Italian => "it",
			Language::Dutch => "nl",
			Language::Russian => "ru",
			Language::Swedish => "sv",
			Language::Norwegian => "no",
			Language::Danish => "da",
			Language::Finnish => "fi",
			Language::Hungarian => "hu",
			Language::Turkish => "tr",
		}
	}

	/// Lowercase English name, as used on the wire.
	pub fn name(self) -> &'static str {
		match self {
			Language::Portuguese => "portuguese",
			Language::English => "english",
			Language::Spanish => "spanish",
			Language::French => "french",
			Language::German => "german",
			Language::Italian => "italian",
			Language::Dutch => "dutch",
			Language::Russian => "russian",
			Language::Swedish => "swedish",
			Language::Norwegian => "norwegian",
			Language::Danish => "danish",
			Language::Finnish => "finnish",
			Language::Hungarian => "hungarian",
			Language::Turkish => "turkish",
		}
	}

	fn stopword_source(self) -> LANGUAGE {
		match self {
			Language::Portuguese => LANGUAGE::Portuguese,
			Language::English => LANGUAGE::English,
			Language::Spanish => LANGUAGE::Spanish,
			Language::French => LANGUAGE::French,
			Language::German => LANGUAGE::German,
			Language::Italian => LANGUAGE::Italian,
			Language::Dutch => LANGUAGE::Dutch,
			Language::Russian => LANGUAGE::Russian,
			Language::Swedish => LANGUAGE::Swedish,
			Language::Norwegian => LANGUAGE::Norwegian,
			Language::Danish => LANGUAGE::Danish,
			Language::Finnish => LANGUAGE::Finnish,
			Language::Hungarian => LANGUAGE::Hungarian,
			Language::Turkish => LANGUAGE::Turkish,
		}
	}
}

impl FromStr for Language {
	type Err = AnalysisError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.trim().to_lowercase();
		Language::ALL
			.into_iter()
			.find(|language| language.code() == wanted || language.name() == wanted)
			.ok_or_else(|| AnalysisError::UnknownLanguage(s.to_owned()))
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A fixed set of stopwords.
///
/// Words are stored NFC-normalized and lowercase so that they compare equal
/// to the tokens produced by `words`.
///
/// # Invariants
/// - Never mutated once built; share it through `Arc`
#[derive(Clone, Debug, Default)]
pub struct StopwordSet {
	words: HashSet<String>,
}

impl StopwordSet {
	/// Loads the NLTK stopword list of `language`.
	pub fn for_language(language: Language) -> Self {
		get(language.stopword_source()).iter().map(|w| w.to_string()).collect()
	}

	/// Builds a set from an explicit list.
	pub fn from_list(words: &[&str]) -> Self {
		words.iter().copied().collect()
	}

	/// An empty set (nothing is filtered).
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(word)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}

impl<S: AsRef<str>> FromIterator<S> for StopwordSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self { words: iter.into_iter().map(|w| normalize(w.as_ref())).collect() }
	}
}

/// NFC normalization followed by lowercasing.
fn normalize(text: &str) -> String {
	text.nfc().collect::<String>().to_lowercase()
}

fn is_apostrophe(c: char) -> bool {
	c == '\'' || c == '\u{2019}'
}

/// Longest piece of a word treated as an elided clitic (`d'`, `qu'`, `'s`, `'ll`).
const MAX_CLITIC_LEN: usize = 2;

/// Splits a document into lowercase words, in document order.
///
/// Word boundaries follow UAX #29, so punctuation is dropped and accented
/// letters stay inside their word. Words holding an apostrophe are split at
/// it and the clitic pieces are dropped: `d'água` gives `água`, `don't`
/// gives `don`. Nothing else is filtered: numbers and mixed tokens such as
/// `abc123` are still returned.
pub fn words(document: &str) -> Vec<String> {
	let normalized = normalize(document);
	let mut words = Vec::new();
	for word in normalized.unicode_words() {
		if !word.contains(is_apostrophe) {
			words.push(word.to_owned());
			continue;
		}
		words.extend(
			word.split(is_apostrophe)
				.filter(|piece| piece.chars().count() > MAX_CLITIC_LEN)
				.map(str::to_owned),
		);
	}
	words
}

/// True if `token` is non-empty and every character is alphabetic.
pub fn is_alphabetic(token: &str) -> bool {
	!token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Turns raw text into word tokens.
///
/// # Responsibilities
/// - Segment the document into lowercase words (`words`)
/// - Keep only alphabetic tokens
/// - Drop stopwords of the configured language
///
/// Results preserve document order; this is a filter, not a set.
#[derive(Clone, Debug)]
pub struct Tokenizer {
	stopwords: Arc<StopwordSet>,
}

impl Tokenizer {
	/// Creates a tokenizer using the stopword list of `language`.
	pub fn new(language: Language) -> Self {
		Self::with_stopwords(Arc::new(StopwordSet::for_language(language)))
	}

	/// Creates a tokenizer sharing an already loaded stopword set.
	pub fn with_stopwords(stopwords: Arc<StopwordSet>) -> Self {
		Self { stopwords }
	}

	pub fn stopwords(&self) -> &StopwordSet {
		&self.stopwords
	}

	/// Alphabetic tokens only; stopwords are kept.
	pub fn alphabetic_tokens(&self, document: &str) -> Vec<String> {
		words(document).into_iter().filter(|token| is_alphabetic(token)).collect()
	}

	/// Alphabetic tokens that are not stopwords.
	pub fn filter_tokens(&self, document: &str) -> Vec<String> {
		words(document)
			.into_iter()
			.filter(|token| is_alphabetic(token) && !self.stopwords.contains(token))
			.collect()
	}
}

/// One-shot helper: filters `document` with the stopwords of `language`.
///
/// Loads the stopword list on every call; keep a `Tokenizer` around when
/// filtering more than one document.
pub fn filter_tokens(document: &str, language: Language) -> Vec<String> {
	Tokenizer::new(language).filter_tokens(document)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cat_tokenizer() -> Tokenizer {
		Tokenizer::with_stopwords(Arc::new(StopwordSet::from_list(&["o", "e"])))
	}

	#[test]
	fn test_words_lowercase_in_order() {
		assert_eq!(words("Rust IS Fast"), vec!["rust", "is", "fast"]);
	}

	#[test]
	fn test_words_drop_punctuation() {
		assert_eq!(words("Olá, mundo! (teste)..."), vec!["olá", "mundo", "teste"]);
	}

	#[test]
	fn test_words_drop_elided_clitics() {
		assert_eq!(words("copo d'água"), vec!["copo", "água"]);
		assert_eq!(words("copo d\u{2019}água"), vec!["copo", "água"]);
		assert_eq!(words("don't stop, it's late"), vec!["don", "stop", "late"]);
		assert_eq!(words("l'homme qu'il aime"), vec!["homme", "aime"]);
	}

	#[test]
	fn test_short_words_without_apostrophe_kept() {
		assert_eq!(words("a ti é"), vec!["a", "ti", "é"]);
	}

	#[test]
	fn test_decomposed_accents_are_normalized() {
		let tokens = cat_tokenizer().filter_tokens("ca\u{0303}o");
		assert_eq!(tokens, vec!["cão"]);
	}

	#[test]
	fn test_non_alphabetic_tokens_dropped() {
		let tokens = cat_tokenizer().filter_tokens("abc123 2024 coração 3,14 ação");
		assert_eq!(tokens, vec!["coração", "ação"]);
	}

	#[test]
	fn test_filter_pinned_scenario() {
		let tokens = cat_tokenizer().filter_tokens("O gato e o cão correm. O gato dorme.");
		assert_eq!(tokens, vec!["gato", "cão", "correm", "gato", "dorme"]);
	}

	#[test]
	fn test_alphabetic_tokens_keep_stopwords() {
		let tokens = cat_tokenizer().alphabetic_tokens("O gato e 42 o cão");
		assert_eq!(tokens, vec!["o", "gato", "e", "o", "cão"]);
	}

	#[test]
	fn test_empty_and_degenerate_documents() {
		let tokenizer = cat_tokenizer();
		assert!(tokenizer.filter_tokens("").is_empty());
		assert!(tokenizer.filter_tokens("   \n\t").is_empty());
		assert!(tokenizer.filter_tokens("123 456 !!! ---").is_empty());
	}

	#[test]
	fn test_portuguese_stopwords() {
		let set = StopwordSet::for_language(Language::Portuguese);
		assert!(set.contains("o"));
		assert!(set.contains("a"));
		assert!(set.contains("de"));
		assert!(set.contains("e"));
		assert!(!set.contains("gato"));
	}

	#[test]
	fn test_only_stopwords_yield_nothing() {
		assert!(filter_tokens("o a de", Language::Portuguese).is_empty());
		assert!(filter_tokens("O A DE", Language::Portuguese).is_empty());
	}

	#[test]
	fn test_stopword_set_normalizes_entries() {
		let set = StopwordSet::from_list(&["Já", "e\u{0301}"]);
		assert!(set.contains("já"));
		assert!(set.contains("é"));
		assert_eq!(set.len(), 2);
		assert!(StopwordSet::empty().is_empty());
	}

	#[test]
	fn test_language_parsing() {
		assert_eq!("pt".parse::<Language>(), Ok(Language::Portuguese));
		assert_eq!(" English ".parse::<Language>(), Ok(Language::English));
		assert_eq!(
			"klingon".parse::<Language>(),
			Err(AnalysisError::UnknownLanguage("klingon".to_owned()))
		);
		assert_eq!(Language::default(), Language::Portuguese);
		assert_eq!(Language::German.to_string(), "german");
	}
}
