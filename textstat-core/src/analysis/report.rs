use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::request::AnalysisKind;
use super::tokenizer::Language;

/// One ranked entry: a display label and how often it occurred.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RankedItem {
	pub label: String,
	pub count: usize,
}

impl RankedItem {
	pub fn new(label: impl Into<String>, count: usize) -> Self {
		Self { label: label.into(), count }
	}
}

/// Payload of one report section.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionResult {
	/// Space-joined filtered tokens, input of the word-cloud renderer.
	WordCloud { source: String },
	/// `(label, count)` pairs, count descending.
	Ranked(Vec<RankedItem>),
	/// Token length → number of tokens with that length.
	Histogram(BTreeMap<usize, usize>),
}

impl SectionResult {
	/// True when there is nothing to display.
	pub fn is_empty(&self) -> bool {
		match self {
			SectionResult::WordCloud { source } => source.is_empty(),
			SectionResult::Ranked(items) => items.is_empty(),
			SectionResult::Histogram(histogram) => histogram.is_empty(),
		}
	}
}

/// Result of one requested analysis.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Section {
	pub kind: AnalysisKind,
	pub result: SectionResult,
}

/// Everything produced by one `Analyzer::run` call.
///
/// Sections appear in the order the analyses were requested.
/// `warnings` carries non-fatal problems met before analysis (e.g. a page
/// that could not be fetched) so the presentation layer can show them.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisReport {
	pub language: Language,
	pub top_n: usize,
	/// Number of filtered tokens in the document.
	pub token_count: usize,
	pub sections: Vec<Section>,
	#[serde(default)]
	pub warnings: Vec<String>,
}

impl AnalysisReport {
	/// True if no section has anything to display.
	pub fn is_empty(&self) -> bool {
		self.sections.iter().all(|section| section.result.is_empty())
	}

	/// The section produced for `kind`, if it was requested.
	pub fn section(&self, kind: AnalysisKind) -> Option<&SectionResult> {
		self.sections.iter().find(|section| section.kind == kind).map(|section| &section.result)
	}

	pub fn push_warning(&mut self, warning: impl Into<String>) {
		self.warnings.push(warning.into());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_shape() {
		let mut histogram = BTreeMap::new();
		histogram.insert(4, 2);
		let report = AnalysisReport {
			language: Language::Portuguese,
			top_n: 5,
			token_count: 2,
			sections: vec![
				Section {
					kind: AnalysisKind::Words,
					result: SectionResult::Ranked(vec![RankedItem::new("gato", 2)]),
				},
				Section { kind: AnalysisKind::LengthDistribution, result: SectionResult::Histogram(histogram) },
			],
			warnings: Vec::new(),
		};

		let json = serde_json::to_value(&report).unwrap();
		assert_eq!(json["language"], "portuguese");
		assert_eq!(json["sections"][0]["kind"], "words");
		assert_eq!(json["sections"][0]["result"]["ranked"][0]["label"], "gato");
		assert_eq!(json["sections"][1]["result"]["histogram"]["4"], 2);

		let back: AnalysisReport = serde_json::from_value(json).unwrap();
		assert_eq!(back, report);
	}

	#[test]
	fn test_empty_report() {
		let report = AnalysisReport {
			sections: vec![Section {
				kind: AnalysisKind::WordCloud,
				result: SectionResult::WordCloud { source: String::new() },
			}],
			..Default::default()
		};
		assert!(report.is_empty());
		assert!(report.section(AnalysisKind::WordCloud).is_some());
		assert!(report.section(AnalysisKind::Bigrams).is_none());
	}
}
