use std::io::{Cursor, Read};
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::{Html, Selector};
use thiserror::Error;
use zip::ZipArchive;

use crate::io::{get_extension, read_bytes};

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

/// Errors raised while extracting text from a source.
///
/// Callers that cannot proceed should fall back to `Document::empty()`
/// and surface the message as a warning.
#[derive(Debug, Error)]
pub enum IngestError {
	#[error("could not read file: {0}")]
	Io(#[from] std::io::Error),

	#[error("text is not valid UTF-8: {0}")]
	Encoding(#[from] std::string::FromUtf8Error),

	#[error("could not extract PDF text: {0}")]
	Pdf(String),

	#[error("could not read DOCX document: {0}")]
	Docx(String),

	#[error("could not parse HTML: {0}")]
	Html(String),
}

/// Supported input formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
	PlainText,
	Pdf,
	Docx,
	Html,
}

impl SourceFormat {
	/// Format for a MIME type, parameters (`; charset=...`) ignored.
	pub fn from_mime(mime: &str) -> Option<Self> {
		let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
		match essence.as_str() {
			PDF_MIME => Some(SourceFormat::Pdf),
			DOCX_MIME => Some(SourceFormat::Docx),
			"text/html" | "application/xhtml+xml" => Some(SourceFormat::Html),
			"text/plain" => Some(SourceFormat::PlainText),
			_ => None,
		}
	}

	/// Format for a file extension (without the dot).
	pub fn from_extension(extension: &str) -> Option<Self> {
		match extension.to_lowercase().as_str() {
			"pdf" => Some(SourceFormat::Pdf),
			"docx" => Some(SourceFormat::Docx),
			"html" | "htm" => Some(SourceFormat::Html),
			"txt" | "text" | "md" => Some(SourceFormat::PlainText),
			_ => None,
		}
	}

	/// Picks a format from the MIME type first, then the file name.
	///
	/// Anything unrecognised is read as plain text.
	pub fn detect(mime: Option<&str>, filename: Option<&str>) -> Self {
		mime.and_then(Self::from_mime)
			.or_else(|| filename.and_then(get_extension).and_then(|ext| Self::from_extension(&ext)))
			.unwrap_or(SourceFormat::PlainText)
	}
}

/// The raw text handed to the analysis pipeline.
///
/// Immutable once built; whatever the source format, analysis only ever
/// sees a single string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
	text: String,
}

impl Document {
	pub fn from_text(text: impl Into<String>) -> Self {
		Self { text: text.into() }
	}

	/// A document with no text, used when ingestion fails.
	pub fn empty() -> Self {
		Self::default()
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	/// True if the document holds nothing but whitespace.
	pub fn is_blank(&self) -> bool {
		self.text.trim().is_empty()
	}

	pub fn char_count(&self) -> usize {
		self.text.chars().count()
	}

	/// Extracts text from raw bytes of the given format.
	///
	/// - Plain text must be valid UTF-8
	/// - PDF: text of every page, concatenated
	/// - DOCX: paragraphs joined by `\n`
	/// - HTML: see `from_html`
	pub fn from_bytes(bytes: &[u8], format: SourceFormat) -> Result<Self, IngestError> {
		let text = match format {
			SourceFormat::PlainText => String::from_utf8(bytes.to_vec())?,
			SourceFormat::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf(e.to_string()))?,
			SourceFormat::Docx => docx_text(bytes)?,
			SourceFormat::Html => return Self::from_html(&String::from_utf8_lossy(bytes)),
		};
		debug!("extracted {} bytes of text from {:?} source", text.len(), format);
		Ok(Self { text })
	}

	/// Loads a file, choosing the format from its extension.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
		let format = get_extension(&path)
			.and_then(|ext| SourceFormat::from_extension(&ext))
			.unwrap_or(SourceFormat::PlainText);
		let bytes = read_bytes(&path)?;
		Self::from_bytes(&bytes, format)
	}

	/// Keeps the text of every `<p>` element, joined by a single space.
	pub fn from_html(html: &str) -> Result<Self, IngestError> {
		let selector = Selector::parse("p").map_err(|e| IngestError::Html(e.to_string()))?;
		let page = Html::parse_document(html);
		let paragraphs: Vec<String> = page
			.select(&selector)
			.map(|paragraph| paragraph.text().collect::<String>())
			.collect();
		debug!("kept {} paragraphs from HTML page", paragraphs.len());
		Ok(Self { text: paragraphs.join(" ") })
	}
}

/// Reads the paragraphs of a DOCX body.
///
/// Only run text (`w:t`) is kept; tabs and line breaks inside a paragraph
/// become `\t` and `\n`.
fn docx_text(bytes: &[u8]) -> Result<String, IngestError> {
	let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| IngestError::Docx(e.to_string()))?;
	let mut xml = String::new();
	let mut body = archive.by_name(DOCX_BODY).map_err(|e| IngestError::Docx(e.to_string()))?;
	body.read_to_string(&mut xml)?;

	let mut reader = Reader::from_str(&xml);
	let mut paragraphs = Vec::new();
	let mut current = String::new();
	let mut in_text = false;

	loop {
		match reader.read_event().map_err(|e| IngestError::Docx(e.to_string()))? {
			Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
			Event::End(e) => match e.name().as_ref() {
				b"w:t" => in_text = false,
				b"w:p" => paragraphs.push(std::mem::take(&mut current)),
				_ => {}
			},
			Event::Empty(e) => match e.name().as_ref() {
				b"w:tab" => current.push('\t'),
				b"w:br" => current.push('\n'),
				b"w:p" => paragraphs.push(String::new()),
				_ => {}
			},
			Event::Text(t) if in_text => {
				let text = t.unescape().map_err(|e| IngestError::Docx(e.to_string()))?;
				current.push_str(&text);
			}
			Event::Eof => break,
			_ => {}
		}
	}

	Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use zip::write::SimpleFileOptions;
	use zip::ZipWriter;

	use super::*;

	fn docx_bytes(body: &str) -> Vec<u8> {
		let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
		writer.start_file(DOCX_BODY, SimpleFileOptions::default()).unwrap();
		writer.write_all(body.as_bytes()).unwrap();
		writer.finish().unwrap().into_inner()
	}

	#[test]
	fn test_detect_format() {
		assert_eq!(SourceFormat::detect(Some("application/pdf"), Some("a.txt")), SourceFormat::Pdf);
		assert_eq!(SourceFormat::detect(Some(DOCX_MIME), None), SourceFormat::Docx);
		assert_eq!(SourceFormat::detect(Some("text/html; charset=utf-8"), None), SourceFormat::Html);
		assert_eq!(SourceFormat::detect(Some("application/octet-stream"), Some("Relatorio.DOCX")), SourceFormat::Docx);
		assert_eq!(SourceFormat::detect(None, Some("notes.csv")), SourceFormat::PlainText);
		assert_eq!(SourceFormat::detect(None, None), SourceFormat::PlainText);
	}

	#[test]
	fn test_plain_text() {
		let document = Document::from_bytes("Olá mundo".as_bytes(), SourceFormat::PlainText).unwrap();
		assert_eq!(document.text(), "Olá mundo");
		assert_eq!(document.char_count(), 9);
	}

	#[test]
	fn test_plain_text_invalid_utf8() {
		let result = Document::from_bytes(&[0x66, 0xff, 0xfe], SourceFormat::PlainText);
		assert!(matches!(result, Err(IngestError::Encoding(_))));
	}

	#[test]
	fn test_html_paragraphs_only() {
		let html = "<html><head><title>Título</title></head><body>\
			<p>Olá <b>mundo</b></p><div>ignorado</div><p>fim</p></body></html>";
		let document = Document::from_html(html).unwrap();
		assert_eq!(document.text(), "Olá mundo fim");
	}

	#[test]
	fn test_html_without_paragraphs() {
		let document = Document::from_bytes(b"<div>nada</div>", SourceFormat::Html).unwrap();
		assert!(document.is_blank());
	}

	#[test]
	fn test_docx_paragraphs() {
		let body = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Primeiro parágrafo</w:t></w:r></w:p><w:p/><w:p><w:r><w:t xml:space="preserve">Segundo </w:t></w:r><w:r><w:instrText>PAGE</w:instrText><w:t>P&amp;D</w:t></w:r></w:p></w:body></w:document>"#;
		let document = Document::from_bytes(&docx_bytes(body), SourceFormat::Docx).unwrap();
		assert_eq!(document.text(), "Primeiro parágrafo\n\nSegundo P&D");
	}

	#[test]
	fn test_docx_not_a_zip() {
		let result = Document::from_bytes(b"plain words", SourceFormat::Docx);
		assert!(matches!(result, Err(IngestError::Docx(_))));
	}

	#[test]
	fn test_pdf_garbage() {
		let result = Document::from_bytes(b"not a pdf at all", SourceFormat::Pdf);
		assert!(matches!(result, Err(IngestError::Pdf(_))));
	}

	#[test]
	fn test_missing_file() {
		assert!(matches!(Document::from_path("./no/such/file.txt"), Err(IngestError::Io(_))));
	}
}
