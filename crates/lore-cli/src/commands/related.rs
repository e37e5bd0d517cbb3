use anyhow::{Result, bail};
use colored::Colorize;
use lore_core::Config;
use lore_core::search::find_related;

use crate::cli::RelatedArgs;
use crate::output::text::format_score;
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::load_index;

pub async fn execute(args: &RelatedArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let index = load_index(&args.source).await?;
    if index.get(&args.id).is_none() {
        bail!("No sample with id '{}' in the index", args.id);
    }

    let threshold = args.threshold.unwrap_or(config.search.related_threshold);
    let related = find_related(&index, &args.id, threshold, args.limit);

    match format {
        OutputFormat::Json => emit_json(&related),
        OutputFormat::Text => {
            if related.is_empty() {
                println!("Nothing related to '{}' above {threshold}", args.id);
            }
            for item in &related {
                println!(
                    "{} {} {}",
                    format_score(item.similarity).green(),
                    item.entry.title.bold(),
                    format!("({})", item.entry.id).bright_black()
                );
            }
            Ok(())
        },
    }
}
