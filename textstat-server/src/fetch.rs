use log::debug;
use reqwest::Client;
use textstat_core::Document;

/// Fetches `url` and keeps the text of its `<p>` elements.
///
/// # Errors
/// Returns the error message if the request fails, the server answers with
/// an error status, or the page cannot be parsed.
pub async fn fetch_page(client: &Client, url: &str) -> Result<Document, String> {
	let response = client
		.get(url)
		.send()
		.await
		.and_then(|response| response.error_for_status())
		.map_err(|e| e.to_string())?;

	let html = response.text().await.map_err(|e| e.to_string())?;
	debug!("fetched {} bytes from {}", html.len(), url);

	Document::from_html(&html).map_err(|e| e.to_string())
}
