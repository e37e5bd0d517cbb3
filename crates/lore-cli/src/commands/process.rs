use anyhow::Result;
use colored::Colorize;
use lore_core::{Config, annotate_anchors, process_document_with};

use crate::cli::ProcessArgs;
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::read_document;

pub fn execute(args: &ProcessArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let raw = read_document(&args.source)?;
    let doc = process_document_with(&raw, config);

    if args.anchors {
        let annotated = annotate_anchors(&doc.body);
        return match format {
            OutputFormat::Json => emit_json(&serde_json::json!({ "body": annotated })),
            OutputFormat::Text => {
                println!("{annotated}");
                Ok(())
            },
        };
    }

    match format {
        OutputFormat::Json => emit_json(&doc),
        OutputFormat::Text => {
            let title = doc
                .metadata
                .as_ref()
                .and_then(|m| m.title.as_deref())
                .or_else(|| doc.headings.first().map(|h| h.text.as_str()))
                .unwrap_or("(untitled)");
            println!("{}", title.bold());

            if let Some(meta) = &doc.metadata {
                if let Some(level) = meta.skill_level {
                    println!("  level: {level:?}");
                }
                if !meta.tags.is_empty() {
                    println!("  tags: {}", meta.tags.join(", "));
                }
            }
            println!("  reading time: {} min", doc.reading_time_minutes);
            println!("  headings: {}", doc.headings.len());

            if !doc.code_blocks.is_empty() {
                println!("\n{}", "Code blocks".bold());
                for block in &doc.code_blocks {
                    let detected = if block.detected_language.is_some() { " (detected)" } else { "" };
                    println!(
                        "  {} {}{} {} lines  {}",
                        block.id.bright_black(),
                        block.language.cyan(),
                        detected,
                        block.line_count,
                        block.title.as_deref().unwrap_or_default()
                    );
                }
            }
            Ok(())
        },
    }
}
