//! # Output Formatting
//!
//! - **Text**: colored, human-readable summaries for a terminal
//! - **JSON**: one pretty-printed JSON document per invocation
//!
//! Commands build their result value first and hand it to [`emit_json`] or to
//! a text renderer in [`text`], so both formats always describe the same data.

pub mod text;

use anyhow::Result;
use clap::Args;
use is_terminal::IsTerminal;
use serde::Serialize;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Shared clap argument for commands that accept an output format.
#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct FormatArg {
    /// Output format (`text` or `json`)
    #[arg(short = 'f', long = "format", value_enum, env = "LORE_OUTPUT_FORMAT")]
    pub format: Option<OutputFormat>,
}

impl FormatArg {
    /// The explicit format, else text on a terminal and JSON when piped.
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            if std::io::stdout().is_terminal() {
                OutputFormat::Text
            } else {
                OutputFormat::Json
            }
        })
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn emit_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
