use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use textstat_core::analysis::request::parse_kinds;
use textstat_core::{AnalysisError, AnalysisKind, AnalysisRequest, Analyzer, Document, Language, SourceFormat};

use self::config::ServerConfig;
use self::fetch::fetch_page;

mod config;
mod fetch;

/// Message returned when a request carries no text, file or URL.
const EMPTY_INPUT: &str = "Please enter text or attach a file.";

/// JSON body of the `/v1/analyze` endpoint
#[derive(Deserialize)]
struct AnalyzeBody {
	text: Option<String>,
	url: Option<String>,
	#[serde(default)]
	analyses: Vec<AnalysisKind>,
	top_n: Option<usize>,
	language: Option<String>, // code or name, e.g. "pt"
}

/// Query parameters of the `/v1/analyze/file` endpoint
#[derive(Deserialize)]
struct FileParams {
	analyses: Option<String>, // comma separated, e.g. "words,bigrams"
	top_n: Option<usize>,
	language: Option<String>,
	filename: Option<String>,
}

#[derive(Serialize)]
struct KindInfo {
	name: &'static str,
	label: &'static str,
}

#[derive(Serialize)]
struct LanguageInfo {
	code: &'static str,
	name: &'static str,
}

/// State shared by every worker.
///
/// Analyzers are built lazily, one per language, so each stopword list is
/// loaded at most once per process.
struct SharedData {
	config: ServerConfig,
	client: Client,
	analyzers: Mutex<HashMap<Language, Arc<Analyzer>>>,
}

impl SharedData {
	fn new(config: ServerConfig) -> reqwest::Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_secs(config.fetch_timeout_secs))
			.build()?;
		Ok(Self { config, client, analyzers: Mutex::new(HashMap::new()) })
	}

	fn analyzer(&self, language: Language) -> Result<Arc<Analyzer>, String> {
		let mut analyzers = self.analyzers.lock().map_err(|_| "Analyzer lock failed".to_owned())?;
		let analyzer = analyzers.entry(language).or_insert_with(|| {
			info!("loading {} stopwords", language);
			Arc::new(Analyzer::new(language))
		});
		Ok(Arc::clone(analyzer))
	}

	/// Builds the request, falling back to the configured defaults.
	fn request(&self, kinds: Vec<AnalysisKind>, top_n: Option<usize>, language: Option<Language>) -> Result<AnalysisRequest, AnalysisError> {
		AnalysisRequest::new(kinds)
			.with_language(language.unwrap_or(self.config.language))
			.with_top_n(top_n.unwrap_or(self.config.top_n))
	}
}

/// Same rules for both endpoints: ISO code or English name, any case.
fn parse_language(value: Option<&str>) -> Result<Option<Language>, AnalysisError> {
	value.map(str::parse::<Language>).transpose()
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|s| !s.trim().is_empty())
}

/// Runs the analysis off the async workers and answers with the report.
async fn analyze(data: &SharedData, request: AnalysisRequest, document: Document, warnings: Vec<String>) -> HttpResponse {
	let analyzer = match data.analyzer(request.language) {
		Ok(a) => a,
		Err(e) => return HttpResponse::InternalServerError().body(e),
	};

	match web::block(move || analyzer.run(&request, &document)).await {
		Ok(mut report) => {
			report.warnings.extend(warnings);
			HttpResponse::Ok().json(report)
		}
		Err(e) => HttpResponse::InternalServerError().body(format!("Analysis failed: {e}")),
	}
}

/// HTTP GET endpoint `/v1/analyses`
///
/// Lists the analysis kinds a client can request.
#[get("/v1/analyses")]
async fn get_analyses() -> impl Responder {
	let kinds: Vec<KindInfo> = AnalysisKind::ALL
		.into_iter()
		.map(|kind| KindInfo { name: kind.name(), label: kind.label() })
		.collect();
	HttpResponse::Ok().json(kinds)
}

#[get("/v1/languages")]
async fn get_languages() -> impl Responder {
	let languages: Vec<LanguageInfo> = Language::ALL
		.into_iter()
		.map(|language| LanguageInfo { code: language.code(), name: language.name() })
		.collect();
	HttpResponse::Ok().json(languages)
}

/// HTTP POST endpoint `/v1/analyze`
///
/// Analyzes pasted text, or the paragraphs of a web page when no text is
/// given. A page that cannot be fetched is analyzed as an empty document
/// and the reason is reported in `warnings`.
#[post("/v1/analyze")]
async fn post_analyze(data: web::Data<SharedData>, body: web::Json<AnalyzeBody>) -> impl Responder {
	let body = body.into_inner();

	let language = match parse_language(body.language.as_deref()) {
		Ok(language) => language,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};
	let request = match data.request(body.analyses, body.top_n, language) {
		Ok(r) => r,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let mut warnings = Vec::new();
	let document = match (non_blank(body.text), non_blank(body.url)) {
		(Some(text), _) => Document::from_text(text),
		(None, Some(url)) => match fetch_page(&data.client, url.trim()).await {
			Ok(document) => document,
			Err(e) => {
				warn!("could not fetch {url}: {e}");
				warnings.push(format!("Error accessing the site: {e}"));
				Document::empty()
			}
		},
		(None, None) => return HttpResponse::BadRequest().body(EMPTY_INPUT),
	};

	analyze(&data, request, document, warnings).await
}

/// HTTP POST endpoint `/v1/analyze/file`
///
/// The body is the raw file. Its format comes from the `Content-Type`
/// header, then from the `filename` extension; plain text otherwise.
#[post("/v1/analyze/file")]
async fn post_analyze_file(
	req: HttpRequest,
	data: web::Data<SharedData>,
	query: web::Query<FileParams>,
	body: web::Bytes,
) -> impl Responder {
	if body.is_empty() {
		return HttpResponse::BadRequest().body(EMPTY_INPUT);
	}

	let kinds = match query.analyses.as_deref().map(parse_kinds).transpose() {
		Ok(kinds) => kinds.unwrap_or_default(),
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};
	let language = match parse_language(query.language.as_deref()) {
		Ok(language) => language,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};
	let request = match data.request(kinds, query.top_n, language) {
		Ok(r) => r,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let mime = req.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
	let format = SourceFormat::detect(mime, query.filename.as_deref());

	let mut warnings = Vec::new();
	let document = match web::block(move || Document::from_bytes(&body, format)).await {
		Ok(Ok(document)) => document,
		Ok(Err(e)) => {
			warn!("could not extract {:?} upload: {e}", format);
			warnings.push(e.to_string());
			Document::empty()
		}
		Err(e) => return HttpResponse::InternalServerError().body(format!("Extraction failed: {e}")),
	};

	analyze(&data, request, document, warnings).await
}

/// Registers every endpoint and the body size limits.
fn configure(data: web::Data<SharedData>) -> impl FnOnce(&mut web::ServiceConfig) {
	move |cfg| {
		let limit = data.config.max_body_bytes;
		cfg.app_data(data)
			.app_data(web::PayloadConfig::new(limit))
			.app_data(web::JsonConfig::default().limit(limit))
			.service(get_analyses)
			.service(get_languages)
			.service(post_analyze)
			.service(post_analyze_file);
	}
}

/// Main entry point for the server.
///
/// Reads the configuration from the environment, then starts an Actix-web
/// HTTP server with the analysis endpoints.
#[actix_web::main]
async fn main() -> io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::new();
	let bind = (config.host.clone(), config.port);
	let shared_data = web::Data::new(SharedData::new(config).map_err(io::Error::other)?);

	// Warm up the default language before the first request
	if let Err(e) = shared_data.analyzer(shared_data.config.language) {
		warn!("{e}");
	}

	info!("listening on {}:{}", bind.0, bind.1);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.configure(configure(shared_data.clone()))
	})
		.bind(bind)?
		.run()
		.await
}
