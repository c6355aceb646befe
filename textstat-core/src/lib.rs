//! Frequency-based text statistics library.
//!
//! This crate provides the analysis pipeline behind the text statistics tools:
//! - Unicode-aware tokenization with stopword filtering
//! - Frequency counting with a stable, first-seen tie-break ranking
//! - Word n-gram generation (unigrams through quadrigrams)
//! - A façade running the requested analyses and building a report
//! - Text extraction from plain text, PDF, DOCX and HTML sources
//!
//! The analysis functions never fail on text content: empty or degenerate
//! documents simply produce empty results.

/// Tokenization, counting, n-grams and the analysis façade.
pub mod analysis;

/// Document ingestion (text extraction from the supported formats).
pub mod ingest;

/// I/O utilities (file loading, extension helpers).
///
/// Not exposed
pub(crate) mod io;

pub use analysis::analyzer::{Analyzer, WordFrequency};
pub use analysis::request::{AnalysisKind, AnalysisRequest};
pub use analysis::report::{AnalysisReport, RankedItem, Section, SectionResult};
pub use analysis::tokenizer::Language;
pub use analysis::AnalysisError;
pub use ingest::{Document, IngestError, SourceFormat};
