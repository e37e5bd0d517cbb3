use anyhow::{Context, Result};
use colored::Colorize;
use lore_core::{IndexExport, IndexService};
use std::fs;
use tracing::info;

use crate::cli::IndexArgs;
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::read_samples;

pub async fn execute(args: &IndexArgs, format: OutputFormat) -> Result<()> {
    let batch = read_samples(&args.samples)?;
    let service = IndexService::new();
    let index = service.rebuild_batch(batch).await?;

    if let Some(path) = &args.output {
        let json = IndexExport::from_generation(&index).to_json()?;
        fs::write(path, json).with_context(|| format!("Failed to write index to {}", path.display()))?;
        info!(path = %path.display(), entries = index.len(), "wrote index export");
    }

    let stats = &index.stats;
    match format {
        OutputFormat::Json => emit_json(stats),
        OutputFormat::Text => {
            println!(
                "Indexed {} samples ({} skipped)",
                stats.total_entries.to_string().green(),
                stats.skipped
            );
            println!("  average complexity: {:.1}", stats.average_complexity);

            let languages: Vec<String> = stats.by_language.iter().map(|(k, v)| format!("{k} {v}")).collect();
            println!("  languages: {}", languages.join(", "));
            let categories: Vec<String> = stats.by_category.iter().map(|(k, v)| format!("{k} {v}")).collect();
            println!("  categories: {}", categories.join(", "));

            if !stats.top_patterns.is_empty() {
                println!("  top patterns:");
                for pattern in &stats.top_patterns {
                    println!("    {:<20} {}", pattern.name, pattern.count);
                }
            }
            if let Some(path) = &args.output {
                println!("Wrote {}", path.display());
            }
            Ok(())
        },
    }
}
