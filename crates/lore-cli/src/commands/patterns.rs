use anyhow::Result;
use colored::Colorize;
use lore_core::search::{find_patterns, search_patterns};

use crate::cli::PatternsArgs;
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::load_index;

pub async fn execute(args: &PatternsArgs, format: OutputFormat) -> Result<()> {
    if let Some(query) = &args.find {
        let patterns = find_patterns(query);
        return match format {
            OutputFormat::Json => emit_json(&patterns),
            OutputFormat::Text => {
                if patterns.is_empty() {
                    println!("No catalog pattern matches '{query}'");
                }
                for pattern in patterns {
                    println!(
                        "{} {} {}",
                        pattern.name.bold(),
                        format!("[{} · difficulty {}]", pattern.category, pattern.difficulty).cyan(),
                        pattern.description
                    );
                }
                Ok(())
            },
        };
    }

    let index = load_index(&args.source).await?;
    let matches = search_patterns(&index, args.category.as_deref());

    match format {
        OutputFormat::Json => emit_json(&matches),
        OutputFormat::Text => {
            if matches.is_empty() {
                println!("No patterns found");
            }
            for found in &matches {
                println!(
                    "{:<22} {:>3}x  {} {}",
                    found.pattern.name.bold(),
                    found.count,
                    found.entry.title,
                    format!("({})", found.entry.id).bright_black()
                );
            }
            Ok(())
        },
    }
}
