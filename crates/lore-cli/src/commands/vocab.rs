use anyhow::Result;
use colored::Colorize;
use lore_core::vocabulary::VocabularyDetector;
use lore_core::{Config, extract_metadata};

use crate::cli::VocabArgs;
use crate::output::text::format_score;
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::{read_document, read_glossary};

pub fn execute(args: &VocabArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let glossary = read_glossary(&args.glossary)?;
    let body = extract_metadata(&read_document(&args.source)?).body;

    let min_confidence = args.min_confidence.unwrap_or(config.vocabulary.min_confidence);
    let detector = VocabularyDetector::new(&glossary, config.vocabulary.clone());
    let matches = detector.detect(&body, min_confidence);

    match format {
        OutputFormat::Json => emit_json(&matches),
        OutputFormat::Text => {
            if matches.is_empty() {
                println!("No glossary terms found");
            }
            for found in &matches {
                println!(
                    "{}:{} {} {} {}",
                    found.line,
                    found.column,
                    found.term.bold(),
                    format_score(found.confidence).green(),
                    found.definition.bright_black()
                );
            }
            Ok(())
        },
    }
}
