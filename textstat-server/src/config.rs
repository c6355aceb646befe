use std::env;

use log::warn;
use textstat_core::analysis::request::{DEFAULT_TOP_N, MAX_TOP_N, MIN_TOP_N};
use textstat_core::Language;

/// Server settings, read from the environment.
pub struct ServerConfig {
	/// Interface to bind
	pub host: String,
	pub port: u16,
	/// Stopword language when a request does not name one
	pub language: Language,
	/// Top N when a request does not set one
	pub top_n: usize,
	/// Timeout for fetching a page given by URL
	pub fetch_timeout_secs: u64,
	/// Largest accepted request body (uploads and JSON text)
	pub max_body_bytes: usize,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 5000,
			language: Language::default(),
			top_n: DEFAULT_TOP_N,
			fetch_timeout_secs: 10,
			max_body_bytes: 16 * 1024 * 1024,
		}
	}
}

impl ServerConfig {
	pub fn new() -> Self {
		let defaults = Self::default();

		let host = env::var("TEXTSTAT_HOST").unwrap_or(defaults.host);

		let port = env::var("TEXTSTAT_PORT")
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(defaults.port);

		let language = match env::var("TEXTSTAT_LANGUAGE") {
			Ok(v) => v.parse::<Language>().unwrap_or_else(|e| {
				warn!("{e}, using {}", defaults.language);
				defaults.language
			}),
			Err(_) => defaults.language,
		};

		let top_n = match env::var("TEXTSTAT_TOP_N") {
			Ok(v) => parse_top_n(&v).unwrap_or_else(|e| {
				warn!("{e}, using {}", defaults.top_n);
				defaults.top_n
			}),
			Err(_) => defaults.top_n,
		};

		let fetch_timeout_secs = env::var("TEXTSTAT_FETCH_TIMEOUT_SECS")
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(defaults.fetch_timeout_secs);

		let max_body_bytes = env::var("TEXTSTAT_MAX_BODY_BYTES")
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(defaults.max_body_bytes);

		Self { host, port, language, top_n, fetch_timeout_secs, max_body_bytes }
	}
}

/// Parses a default top N, which must be within `MIN_TOP_N..=MAX_TOP_N`.
fn parse_top_n(value: &str) -> Result<usize, String> {
	match value.trim().parse::<usize>() {
		Ok(n) if (MIN_TOP_N..=MAX_TOP_N).contains(&n) => Ok(n),
		_ => Err(format!("TEXTSTAT_TOP_N must be between {MIN_TOP_N} and {MAX_TOP_N}, got {value:?}")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_top_n() {
		assert_eq!(parse_top_n("20"), Ok(20));
		assert_eq!(parse_top_n(" 100 "), Ok(100));
		assert!(parse_top_n("0").is_err());
		assert!(parse_top_n("101").is_err());
		assert!(parse_top_n("many").is_err());
	}
}
