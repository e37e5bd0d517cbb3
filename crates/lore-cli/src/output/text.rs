//! Terminal rendering helpers

use colored::Colorize;
use html_escape::decode_html_entities;
use lore_core::TocSection;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Turn an escaped, `<mark>`-annotated snippet into terminal text with the
/// marked spans emphasized.
pub fn render_highlight(snippet: &str) -> String {
    let mut out = String::with_capacity(snippet.len());
    let mut rest = snippet;

    while let Some(start) = rest.find(MARK_OPEN) {
        out.push_str(&decode_html_entities(&rest[..start]));
        let after = &rest[start + MARK_OPEN.len()..];
        let (marked, tail) = after.split_once(MARK_CLOSE).unwrap_or((after, ""));
        out.push_str(&decode_html_entities(marked).bold().yellow().to_string());
        rest = tail;
    }
    out.push_str(&decode_html_entities(rest));
    out
}

/// Indented outline of a TOC forest.
pub fn render_toc(sections: &[TocSection]) -> Vec<String> {
    let mut lines = Vec::new();
    push_sections(&mut lines, sections, 0);
    lines
}

fn push_sections(lines: &mut Vec<String>, sections: &[TocSection], depth: usize) {
    for section in sections {
        lines.push(format!(
            "{}{} {}",
            "  ".repeat(depth),
            section.title,
            format!("#{}", section.id).bright_black()
        ));
        push_sections(lines, &section.children, depth + 1);
    }
}

/// Score as a fixed-width decimal.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}
