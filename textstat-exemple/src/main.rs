use textstat_core::analysis::request::parse_kinds;
use textstat_core::{AnalysisKind, AnalysisRequest, Analyzer, Document, Language, SectionResult};

const TEXT: &str = "O gato subiu no telhado. O gato desceu do telhado e foi dormir. \
    Amanhã o gato sobe no telhado outra vez.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The analyzer holds the stopwords of one language (Portuguese by default)
    // It can be reused for any number of documents
    let analyzer = Analyzer::new(Language::Portuguese);

    // Documents come from plain text here, but could also be loaded
    // from a file with 'Document::from_path' (txt, pdf, docx, html)
    let document = Document::from_text(TEXT);

    // Analyses run in the order they are added, duplicates are ignored
    let mut request = AnalysisRequest::new([AnalysisKind::Words, AnalysisKind::Bigrams]);
    request.add_kind(AnalysisKind::LengthDistribution);
    request.add_kind(AnalysisKind::Words);

    // Kinds can also be parsed from a comma separated list
    for kind in parse_kinds("trigrams, word_cloud")? {
        request.add_kind(kind);
    }

    // Unknown names are rejected
    match parse_kinds("words,pentagrams") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Number of items kept for ranked analyses (must be between 1 and 100)
    request.set_top_n(5)?;

    // Test invalid top N values
    match request.set_top_n(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }
    match request.set_top_n(500) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Languages can be given by name or ISO code
    let language: Language = "pt".parse()?;
    let request = request.with_language(language);

    let report = analyzer.run(&request, &document);
    println!("{} filtered tokens", report.token_count);

    for section in &report.sections {
        println!("== {} ==", section.kind.label());
        match &section.result {
            SectionResult::WordCloud { source } => println!("{source}"),
            SectionResult::Ranked(items) => {
                for item in items {
                    println!("{}: {}", item.label, item.count);
                }
            }
            SectionResult::Histogram(histogram) => {
                for (length, count) in histogram {
                    println!("{length} letters: {count}");
                }
            }
        }
    }

    // Single analyses are also available without a request
    let bigrams = analyzer.ngram_frequency(TEXT, 2, 3)?;
    println!("Top bigram: {:?}", bigrams.first());

    // Windows above four are not supported
    match analyzer.ngram_frequency(TEXT, 5, 3) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    Ok(())
}
