//! Fenced code sample extraction.
//!
//! Each fenced span in a document body goes through the same pipeline:
//!
//! 1. [`clean_code`] strips rendering artifacts.
//! 2. [`parse_directives`] reads `Title:`/`File:`/... comments from the top
//!    and removes them from the code.
//! 3. [`resolve_language`] settles the language from the fence tag or content.
//! 4. A title is chosen and display defaults are applied.
//! 5. The block gets an id from the configured [`IdStrategy`].
//!
//! Unclosed fences run to the end of the text. Extraction never fails.

mod clean;
mod directives;
mod language;

pub use clean::clean_code;
pub use directives::{Directives, is_generic_title, parse_directives, parse_line_list};
pub use language::{
    FALLBACK_LANGUAGE, ResolvedLanguage, detect_language, normalize_tag, resolve_language,
};

use crate::config::{CodeBlockConfig, IdStrategy};
use crate::fence::open_fence;
use crate::CodeBlock;
use tracing::debug;

/// Extracts [`CodeBlock`]s from a document body with fixed display settings.
#[derive(Debug, Clone, Default)]
pub struct CodeBlockExtractor {
    config: CodeBlockConfig,
}

/// A fenced span before any processing.
struct RawBlock<'a> {
    info: &'a str,
    lines: Vec<&'a str>,
}

impl CodeBlockExtractor {
    pub const fn new(config: CodeBlockConfig) -> Self {
        Self { config }
    }

    /// Extract all fenced blocks in document order.
    ///
    /// Sequence numbers start at 1 for every call.
    pub fn extract(&self, body: &str) -> Vec<CodeBlock> {
        let stamp = match self.config.id_strategy {
            IdStrategy::Timestamped => Some(chrono::Utc::now().timestamp()),
            IdStrategy::Sequential => None,
        };

        let blocks: Vec<CodeBlock> = scan_fences(body)
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                let id = match stamp {
                    Some(secs) => format!("code-{}-{secs}", idx + 1),
                    None => format!("code-{}", idx + 1),
                };
                self.build_block(id, &raw)
            })
            .collect();

        debug!(count = blocks.len(), "extracted code blocks");
        blocks
    }

    fn build_block(&self, id: String, raw: &RawBlock<'_>) -> CodeBlock {
        let cleaned = clean_code(&raw.lines.join("\n"));
        let (directives, code) = parse_directives(&cleaned);

        let declared = raw.info.split_whitespace().next();
        let resolved = resolve_language(declared, &code);
        let title = directives::resolve_title(&directives, &code, &resolved.language);

        let line_count = code.lines().count();
        let show_line_numbers = directives
            .show_line_numbers
            .unwrap_or(line_count > self.config.line_numbers_after_lines);

        CodeBlock {
            id,
            language: resolved.language,
            detected_language: resolved.detected,
            code,
            line_count,
            title: Some(title),
            file_name: directives.file_name,
            category: directives.category,
            tags: directives.tags,
            show_line_numbers,
            is_collapsible: line_count > self.config.collapse_after_lines,
            highlight_lines: directives.highlight_lines.filter(|lines| !lines.is_empty()),
        }
    }
}

/// Extract code blocks with default settings.
///
/// ```rust
/// use lore_core::extract_code_blocks;
///
/// let body = "Intro\n\n```ts\nconst n: number = 1;\n```\n";
/// let blocks = extract_code_blocks(body);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].language, "typescript");
/// assert!(blocks[0].id.starts_with("code-1-"));
/// ```
pub fn extract_code_blocks(body: &str) -> Vec<CodeBlock> {
    CodeBlockExtractor::default().extract(body)
}

/// Count fenced blocks without processing them.
pub fn count_fenced_blocks(body: &str) -> usize {
    scan_fences(body).len()
}

fn scan_fences(body: &str) -> Vec<RawBlock<'_>> {
    let mut blocks = Vec::new();
    let mut lines = body.lines();

    while let Some(line) = lines.next() {
        let Some((fence, info)) = open_fence(line) else {
            continue;
        };

        let mut content = Vec::new();
        let mut closed = false;
        for inner in lines.by_ref() {
            if fence.is_closed_by(inner) {
                closed = true;
                break;
            }
            content.push(inner.trim_end_matches('\r'));
        }
        if !closed {
            debug!(info, "unclosed fence runs to end of text");
        }

        blocks.push(RawBlock {
            info,
            lines: content,
        });
    }

    blocks
}
