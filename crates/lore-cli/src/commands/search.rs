use anyhow::Result;
use colored::Colorize;
use lore_core::search::{ResultGroup, search};
use lore_core::{Config, SearchFilter, SearchOptions, SearchResultItem, group_by_category, group_by_language};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::cli::{GroupBy, SearchArgs};
use crate::output::text::{format_score, render_highlight};
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::load_index;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload<'a> {
    query: &'a str,
    total_results: usize,
    search_time_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<&'a [SearchResultItem]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<&'a [ResultGroup]>,
}

pub async fn execute(args: &SearchArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let index = load_index(&args.source).await?;
    let (filter, options) = build_query(args, config);

    let started = Instant::now();
    let results = search(&index, &args.query, &filter, &options);
    let elapsed = started.elapsed();
    debug!(results = results.len(), elapsed_ms = elapsed.as_millis(), "search finished");

    let groups = args.group_by.map(|by| match by {
        GroupBy::Language => group_by_language(&results),
        GroupBy::Category => group_by_category(&results),
    });

    match format {
        OutputFormat::Json => emit_json(&SearchPayload {
            query: &args.query,
            total_results: results.len(),
            search_time_ms: elapsed.as_millis(),
            results: groups.is_none().then_some(results.as_slice()),
            groups: groups.as_deref(),
        }),
        OutputFormat::Text => {
            if results.is_empty() {
                println!("No results for '{}'", args.query);
                return Ok(());
            }
            match &groups {
                Some(groups) => {
                    for group in groups {
                        println!("{} ({})", group.key.bold().underline(), group.items.len());
                        print_results(&group.items);
                        println!();
                    }
                },
                None => print_results(&results),
            }
            println!(
                "{}",
                format!("{} results in {}ms", results.len(), elapsed.as_millis()).bright_black()
            );
            Ok(())
        },
    }
}

fn build_query(args: &SearchArgs, config: &Config) -> (SearchFilter, SearchOptions) {
    let filter = SearchFilter {
        tags: args.tags.clone(),
        skill_levels: args.levels.clone(),
        difficulty_range: args.difficulty,
        ..SearchFilter::default()
    };

    let mut options = SearchOptions::from_config(&config.search);
    options.languages.clone_from(&args.languages);
    options.categories.clone_from(&args.categories);
    options.concept_paths.clone_from(&args.concept_paths);
    options.fuzzy = !args.no_fuzzy;
    if let Some(limit) = args.limit {
        options.max_results = limit;
    }
    if let Some(min_score) = args.min_score {
        options.min_score = min_score;
    }
    (filter, options)
}

fn print_results(items: &[SearchResultItem]) {
    for (rank, item) in items.iter().enumerate() {
        let entry = &item.entry;
        println!(
            "{:>3}. {} {} {} {}",
            rank + 1,
            entry.title.bold(),
            format!("[{}]", entry.language).cyan(),
            format_score(item.relevance_score).green(),
            format!("{:?}", item.match_type).to_lowercase().bright_black()
        );
        println!("     {} {}", entry.id.bright_black(), entry.concept_path.bright_black());
        for line in render_highlight(&item.highlighted_content).lines() {
            println!("     {line}");
        }
    }
}
