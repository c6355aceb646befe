use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;

use eframe::{egui, Frame};
use egui::Context;

use reqwest::blocking::{Client, Response};
use reqwest::Result;
use serde::Serialize;

use textstat_core::analysis::request::{DEFAULT_TOP_N, MAX_TOP_N, MIN_TOP_N};
use textstat_core::{AnalysisKind, AnalysisReport, Language, SectionResult};

mod widgets;

const EMPTY_INPUT: &str = "Please enter text or attach a file.";

/// Body of `POST /v1/analyze`.
#[derive(Serialize)]
struct AnalyzeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    analyses: &'a [AnalysisKind],
    top_n: usize,
    language: Language,
}

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
    base_url: String,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    ///
    /// The server address comes from `TEXTSTAT_API`.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(60, 0))
            .build()?;
        let base_url = env::var("TEXTSTAT_API").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
        Ok(Self { client, base_url })
    }

    /// Sends a POST request to `/v1/analyze` with a JSON body.
    fn post_analyze(&self, body: &AnalyzeBody) -> std::result::Result<AnalysisReport, String> {
        let response = self.client
            .post(format!("{}/v1/analyze", self.base_url))
            .json(body)
            .send()
            .map_err(|e| e.to_string())?;
        read_report(response)
    }

    /// Sends a POST request to `/v1/analyze/file` with the raw file as body.
    fn post_analyze_file(&self, bytes: Vec<u8>, params: &[(&str, String)]) -> std::result::Result<AnalysisReport, String> {
        let response = self.client
            .post(format!("{}/v1/analyze/file", self.base_url))
            .query(params)
            .body(bytes)
            .send()
            .map_err(|e| e.to_string())?;
        read_report(response)
    }
}

/// Decodes a report, or turns an error status into the server's message.
fn read_report(response: Response) -> std::result::Result<AnalysisReport, String> {
    let status = response.status();
    if status.is_success() {
        response.json().map_err(|e| e.to_string())
    } else {
        let message = response.text().unwrap_or_default();
        Err(format!("{status}: {message}"))
    }
}

/// Which page is shown.
#[derive(Debug, PartialEq)]
enum Page {
    Input,
    Results,
}

/// Global UI state (MUST persist between frames in egui).
struct AnalysisUI {
    rest: RESTContext,
    page: Page,

    text: String,
    url: String,
    file_path: String,

    selected: HashSet<AnalysisKind>,
    top_n: usize,
    language: Language,

    message: Option<String>,
    report: Option<AnalysisReport>,
}

impl AnalysisUI {
    /// Initializes the UI with sane defaults.
    fn new() -> Result<Self> {
        Ok(Self {
            rest: RESTContext::new()?,
            page: Page::Input,

            text: String::new(),
            url: String::new(),
            file_path: String::new(),

            selected: HashSet::new(),
            top_n: DEFAULT_TOP_N,
            language: Language::default(),

            message: None,
            report: None,
        })
    }

    /// Selected kinds, in display order.
    fn kinds(&self) -> Vec<AnalysisKind> {
        AnalysisKind::ALL
            .into_iter()
            .filter(|kind| self.selected.contains(kind))
            .collect()
    }

    /// Sends the file at `file_path`.
    fn analyze_file(&self, kinds: &[AnalysisKind]) -> std::result::Result<AnalysisReport, String> {
        let path = Path::new(self.file_path.trim());
        let bytes = std::fs::read(path).map_err(|e| format!("could not read {}: {e}", path.display()))?;
        let analyses = kinds.iter().map(|kind| kind.name()).collect::<Vec<_>>().join(",");
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let params = [
            ("analyses", analyses),
            ("top_n", self.top_n.to_string()),
            ("language", self.language.name().to_string()),
            ("filename", filename),
        ];
        self.rest.post_analyze_file(bytes, &params)
    }

    /// Sends pasted text or a URL.
    fn analyze_input(&self, text: Option<&str>, url: Option<&str>, kinds: &[AnalysisKind]) -> std::result::Result<AnalysisReport, String> {
        self.rest.post_analyze(&AnalyzeBody {
            text,
            url,
            analyses: kinds,
            top_n: self.top_n,
            language: self.language,
        })
    }

    /// Performs the analysis request.
    ///
    /// Input precedence: file, then text, then URL.
    fn submit(&mut self) {
        let kinds = self.kinds();

        let result = if !self.file_path.trim().is_empty() {
            self.analyze_file(&kinds)
        } else if !self.text.trim().is_empty() {
            self.analyze_input(Some(&self.text), None, &kinds)
        } else if !self.url.trim().is_empty() {
            self.analyze_input(None, Some(self.url.trim()), &kinds)
        } else {
            self.message = Some(EMPTY_INPUT.to_string());
            return;
        };

        match result {
            Ok(report) => {
                self.report = Some(report);
                self.message = None;
                self.page = Page::Results;
            }
            Err(e) => self.message = Some(format!("Error: {e}")),
        }
    }

    fn input_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Text Statistics");
        ui.add_space(8.0);

        ui.label("Enter your text here:");
        ui.add(
            egui::TextEdit::multiline(&mut self.text)
                .desired_rows(12)
                .desired_width(f32::INFINITY),
        );

        egui::Grid::new("input_grid")
            .num_columns(2)
            .spacing([20.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Web page URL");
                ui.text_edit_singleline(&mut self.url);
                ui.end_row();

                ui.label("PDF, DOCX or TXT file path");
                ui.text_edit_singleline(&mut self.file_path);
                ui.end_row();

                ui.label("Top N");
                ui.add(
                    egui::DragValue::new(&mut self.top_n)
                        .range(MIN_TOP_N..=MAX_TOP_N)
                        .speed(1),
                );
                ui.end_row();

                ui.label("Stopword language");
                egui::ComboBox::from_id_salt("language")
                    .selected_text(self.language.name())
                    .show_ui(ui, |ui| {
                        for language in Language::ALL {
                            ui.selectable_value(&mut self.language, language, language.name());
                        }
                    });
                ui.end_row();

                ui.label("Analyses");
                ui.vertical(|ui| {
                    for kind in AnalysisKind::ALL {
                        let mut checked = self.selected.contains(&kind);
                        if ui.checkbox(&mut checked, kind.label()).changed() {
                            if checked {
                                self.selected.insert(kind);
                            } else {
                                self.selected.remove(&kind);
                            }
                        }
                    }
                });
                ui.end_row();
            });

        ui.add_space(8.0);
        if ui
            .add_sized([200.0, 40.0], egui::Button::new("Done"))
            .clicked()
        {
            self.submit();
        }

        if let Some(message) = &self.message {
            ui.colored_label(ui.visuals().warn_fg_color, message);
        }
    }

    fn results_page(&mut self, ui: &mut egui::Ui) {
        ui.heading("Analysis Results");

        if ui.button("Back").clicked() {
            self.page = Page::Input;
            return;
        }

        let Some(report) = &self.report else {
            ui.label("No results");
            return;
        };

        for warning in &report.warnings {
            ui.colored_label(ui.visuals().warn_fg_color, warning);
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for section in &report.sections {
                ui.add_space(12.0);
                match section.kind.window_size() {
                    Some(_) => ui.heading(format!("{} ({})", section.kind.label(), report.top_n)),
                    None => ui.heading(section.kind.label()),
                };

                if section.result.is_empty() {
                    ui.label("No results");
                    continue;
                }

                match &section.result {
                    SectionResult::WordCloud { source } => widgets::word_cloud(ui, source),
                    SectionResult::Ranked(items) => {
                        for item in items {
                            ui.monospace(format!("{}: {}", item.label, item.count));
                        }
                    }
                    SectionResult::Histogram(histogram) => {
                        widgets::bar_chart(ui, histogram, "Word length", "Frequency");
                    }
                }
            }
        });
    }
}

impl eframe::App for AnalysisUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Input => self.input_page(ui),
            Page::Results => self.results_page(ui),
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "textstat",
        options,
        Box::new(|_| Ok(Box::new(AnalysisUI::new()?))),
    )
}
