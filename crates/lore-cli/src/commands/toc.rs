use anyhow::Result;
use lore_core::{TocSection, build_toc, extract_headings, extract_metadata};

use crate::cli::TocArgs;
use crate::output::text::render_toc;
use crate::output::{OutputFormat, emit_json};
use crate::utils::input::read_document;

pub fn execute(args: &TocArgs, format: OutputFormat) -> Result<()> {
    let raw = read_document(&args.source)?;
    let body = extract_metadata(&raw).body;
    let mut toc = build_toc(&extract_headings(&body));

    if let Some(depth) = args.max_depth {
        prune(&mut toc, depth);
    }

    match format {
        OutputFormat::Json => emit_json(&toc),
        OutputFormat::Text => {
            if toc.is_empty() {
                println!("No headings found");
            }
            for line in render_toc(&toc) {
                println!("{line}");
            }
            Ok(())
        },
    }
}

/// Drop sections nested deeper than `depth` levels.
fn prune(sections: &mut [TocSection], depth: u8) {
    for section in sections {
        if depth <= 1 {
            section.children.clear();
        } else {
            prune(&mut section.children, depth - 1);
        }
    }
}
