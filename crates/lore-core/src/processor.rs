//! Whole-document processing.

use crate::code_block::CodeBlockExtractor;
use crate::reading_time::ReadingTimeEstimator;
use crate::{Config, ProcessedDocument, build_toc, extract_headings, extract_metadata};
use tracing::debug;

/// Process `raw` with default settings.
///
/// ```rust
/// use lore_core::process_document;
///
/// let doc = process_document("# Hello World\n\nText.");
/// assert_eq!(doc.headings.len(), 1);
/// assert_eq!(doc.headings[0].id, "hello-world");
/// assert!(doc.code_blocks.is_empty());
/// assert_eq!(doc.reading_time_minutes, 1);
/// ```
pub fn process_document(raw: &str) -> ProcessedDocument {
    process_document_with(raw, &Config::default())
}

/// Split off metadata, then derive headings, code blocks, the TOC and the
/// reading time from the body. Never fails; malformed input degrades.
///
/// The reading time uses the skill level declared in the metadata, if any.
pub fn process_document_with(raw: &str, config: &Config) -> ProcessedDocument {
    let extracted = extract_metadata(raw);
    let body = extracted.body;

    let headings = extract_headings(&body);
    let code_blocks = CodeBlockExtractor::new(config.code_blocks.clone()).extract(&body);
    let toc = build_toc(&headings);

    let skill = extracted.metadata.as_ref().and_then(|m| m.skill_level);
    let reading_time_minutes = ReadingTimeEstimator::new(config.reading_time.clone()).estimate_body(&body, skill);

    debug!(
        headings = headings.len(),
        code_blocks = code_blocks.len(),
        sections = toc.len(),
        reading_time_minutes,
        has_metadata = extracted.metadata.is_some(),
        "processed document"
    );

    ProcessedDocument {
        body,
        headings,
        code_blocks,
        toc,
        reading_time_minutes,
        metadata: extracted.metadata,
    }
}
