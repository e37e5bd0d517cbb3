//! # CLI Structure and Argument Parsing
//!
//! The `lore` binary has two halves:
//!
//! - **Document commands** (`process`, `toc`, `vocab`) read one topic document
//!   from a path, or by id from a content root with `--root`.
//! - **Index commands** (`index`, `search`, `patterns`, `related`) work on a
//!   code-sample corpus, given either as a JSON array of samples
//!   (`--samples`) or as a previously exported index (`--index`).
//!
//! ```bash
//! lore process topics/signals.md
//! lore toc signals/basics --root topics --max-depth 2
//! lore index samples.json --output index.json
//! lore search "computed signal" --index index.json --level intermediate
//! lore patterns --samples samples.json --category rxjs
//! lore related counter-basic --index index.json
//! lore vocab topics/signals.md --glossary glossary.json
//! ```
//!
//! Every command accepts `--format text|json`. When stdout is not a terminal
//! the default is JSON.

use crate::output::FormatArg;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lore_core::SkillLevel;
use std::path::PathBuf;

/// Main CLI structure for the `lore` command
#[derive(Parser, Clone, Debug)]
#[command(name = "lore")]
#[command(version)]
#[command(about = "lore - process topic documents and search code samples", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file. Also via `LORE_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "LORE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands for the `lore` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Extract metadata, headings, code blocks, TOC and reading time
    Process(ProcessArgs),
    /// Show a document's table of contents
    Toc(TocArgs),
    /// Build an index from code samples and report statistics
    Index(IndexArgs),
    /// Search indexed code samples
    Search(SearchArgs),
    /// Find structural code patterns in indexed samples
    Patterns(PatternsArgs),
    /// List samples similar to one sample
    Related(RelatedArgs),
    /// Detect glossary terms in a document
    Vocab(VocabArgs),
}

impl Commands {
    pub const fn format(&self) -> &FormatArg {
        match self {
            Self::Process(args) => &args.format,
            Self::Toc(args) => &args.format,
            Self::Index(args) => &args.format,
            Self::Search(args) => &args.format,
            Self::Patterns(args) => &args.format,
            Self::Related(args) => &args.format,
            Self::Vocab(args) => &args.format,
        }
    }
}

/// Where a document comes from.
#[derive(Args, Clone, Debug)]
pub struct DocumentArgs {
    /// Document path, or document id when `--root` is given
    #[arg(value_name = "DOCUMENT")]
    pub document: String,

    /// Content root; DOCUMENT is then an id resolved to `<root>/<id>.md`
    #[arg(long, value_name = "DIR", env = "LORE_CONTENT_ROOT")]
    pub root: Option<PathBuf>,
}

/// Where an index comes from.
#[derive(Args, Clone, Debug)]
#[group(multiple = false)]
pub struct IndexSource {
    /// JSON array of code samples to index
    #[arg(long, value_name = "FILE")]
    pub samples: Option<PathBuf>,

    /// Index export written by `lore index --output`
    #[arg(long, value_name = "FILE")]
    pub index: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub source: DocumentArgs,

    /// Print the body with heading anchors embedded instead of a summary
    #[arg(long)]
    pub anchors: bool,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct TocArgs {
    #[command(flatten)]
    pub source: DocumentArgs,

    /// Only show sections up to this depth (1 = top level)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=6))]
    pub max_depth: Option<u8>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct IndexArgs {
    /// JSON array of code samples
    #[arg(value_name = "SAMPLES")]
    pub samples: PathBuf,

    /// Write the index export to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub format: FormatArg,
}

/// How to group search results.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    Language,
    Category,
}

#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    #[command(flatten)]
    pub source: IndexSource,

    /// Only samples in these languages (comma-separated)
    #[arg(short = 'l', long = "language", value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Only samples in these categories (comma-separated)
    #[arg(short = 'c', long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Only samples with any of these tags (comma-separated)
    #[arg(short = 't', long = "tag", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Only samples suited to these skill levels (comma-separated)
    #[arg(long = "level", value_delimiter = ',', value_parser = parse_skill_level)]
    pub levels: Vec<SkillLevel>,

    /// Inclusive difficulty range such as `2-4`, or a single value
    #[arg(long, value_name = "RANGE", value_parser = parse_difficulty_range)]
    pub difficulty: Option<(u8, u8)>,

    /// Only samples under these concept paths (comma-separated)
    #[arg(long = "concept", value_delimiter = ',')]
    pub concept_paths: Vec<String>,

    /// Maximum number of results
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Minimum relevance score (0.0-1.0)
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Disable approximate word matching
    #[arg(long)]
    pub no_fuzzy: bool,

    /// Group results
    #[arg(long, value_enum)]
    pub group_by: Option<GroupBy>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct PatternsArgs {
    #[command(flatten)]
    pub source: IndexSource,

    /// Only patterns in this category
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// List catalog patterns whose name or description matches QUERY
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["samples", "index", "category"])]
    pub find: Option<String>,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct RelatedArgs {
    /// Sample id
    pub id: String,

    #[command(flatten)]
    pub source: IndexSource,

    /// Minimum similarity (defaults to the configured related threshold)
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Maximum number of related samples
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,

    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Args, Clone, Debug)]
pub struct VocabArgs {
    #[command(flatten)]
    pub source: DocumentArgs,

    /// Glossary JSON file
    #[arg(short = 'g', long, value_name = "FILE")]
    pub glossary: PathBuf,

    /// Minimum confidence (defaults to the configured value)
    #[arg(long, value_name = "SCORE")]
    pub min_confidence: Option<f64>,

    #[command(flatten)]
    pub format: FormatArg,
}

fn parse_skill_level(raw: &str) -> Result<SkillLevel, String> {
    SkillLevel::parse(raw).ok_or_else(|| {
        format!("unknown skill level '{raw}' (expected fundamentals, intermediate, advanced or expert)")
    })
}

fn parse_difficulty_range(raw: &str) -> Result<(u8, u8), String> {
    let parse = |s: &str| -> Result<u8, String> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid difficulty '{s}'"))?;
        if value > 5 {
            return Err(format!("difficulty {value} is above 5"));
        }
        Ok(value)
    };

    let (lo, hi) = match raw.split_once('-') {
        Some((lo, hi)) => (parse(lo)?, parse(hi)?),
        None => {
            let value = parse(raw)?;
            (value, value)
        },
    };
    if lo > hi {
        return Err(format!("empty difficulty range {lo}-{hi}"));
    }
    Ok((lo, hi))
}
