use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::io;

/// Reads a whole file into memory.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> io::Result<Vec<u8>> {
	let mut contents = Vec::new();
	File::open(filename)?.read_to_end(&mut contents)?;
	Ok(contents)
}

/// Extracts the lowercase extension of a path.
///
/// Examples:
/// - `"./data/Report.PDF"` → `Some("pdf")`
/// - `"notes"` → `None`
pub(crate) fn get_extension<P: AsRef<Path>>(input_path: P) -> Option<String> {
	input_path
		.as_ref()
		.extension()
		.map(|ext| ext.to_string_lossy().to_lowercase())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_get_extension() {
		assert_eq!(get_extension("./data/Report.PDF"), Some("pdf".to_owned()));
		assert_eq!(get_extension("notes.tar.docx"), Some("docx".to_owned()));
		assert_eq!(get_extension("notes"), None);
	}

	#[test]
	fn test_read_missing_file() {
		let err = read_bytes("./definitely/not/here.txt").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}
}
