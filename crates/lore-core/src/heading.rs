//! Heading extraction and anchor generation.
//!
//! Both the table-of-contents pass ([`extract_headings`]) and the markup pass
//! ([`annotate_anchors`]) walk the body with the same [`AnchorSet`], so an
//! anchor produced for navigation always matches the id embedded in the
//! rendered document.

use crate::Heading;
use crate::fence::FenceTracker;
use html_escape::decode_html_entities;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// ATX heading: up to three spaces, 1-6 hashes, whitespace, text.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.+?)[ \t]*$").unwrap());

/// Optional closing sequence (`## Title ##`).
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static CLOSING_HASHES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+#+$").unwrap());

/// Fallback anchor for headings whose text has no sluggable characters.
const EMPTY_SLUG: &str = "section";

/// Per-document set of anchors already handed out.
#[derive(Debug, Default)]
pub struct AnchorSet {
    used: HashSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `text` and make it unique within this set by appending `-2`, `-3`, ...
    ///
    /// ```rust
    /// use lore_core::heading::AnchorSet;
    ///
    /// let mut anchors = AnchorSet::new();
    /// assert_eq!(anchors.assign("Test"), "test");
    /// assert_eq!(anchors.assign("Test"), "test-2");
    /// assert_eq!(anchors.assign("Test"), "test-3");
    /// ```
    pub fn assign(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = EMPTY_SLUG.to_string();
        }

        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }

        self.used.insert(candidate.clone());
        candidate
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Normalize heading text into a URL-safe anchor.
///
/// Lowercases, drops everything outside `[a-z0-9\s_-]`, turns runs of
/// whitespace or underscores into a single hyphen and trims hyphens from both
/// ends. Does not guarantee uniqueness; see [`AnchorSet`].
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|&c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || matches!(c, '_' | '-'))
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_gap = false;
    for ch in kept.chars() {
        if ch.is_whitespace() || ch == '_' {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        } else {
            slug.push(ch);
            in_gap = false;
        }
    }

    slug.trim_matches('-').to_string()
}

/// A heading line as matched before anchor assignment.
struct RawHeading {
    level: u8,
    text: String,
}

fn match_heading(line: &str) -> Option<RawHeading> {
    let caps = HEADING_RE.captures(line.trim_end_matches('\r'))?;
    let level = u8::try_from(caps.get(1)?.as_str().len()).ok()?;
    let raw_text = CLOSING_HASHES_RE.replace(caps.get(2)?.as_str(), "");
    let text = display_text(&raw_text);
    (!text.is_empty()).then_some(RawHeading { level, text })
}

/// Scan `body` for headings in document order, assigning unique anchors.
///
/// Lines inside fenced code are skipped.
///
/// ```rust
/// use lore_core::extract_headings;
///
/// let headings = extract_headings("# Test\n\n## Setup\n\n# Test\n");
/// let ids: Vec<_> = headings.iter().map(|h| h.id.as_str()).collect();
/// assert_eq!(ids, ["test", "setup", "test-2"]);
/// ```
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut anchors = AnchorSet::new();
    let mut fences = FenceTracker::default();
    let mut headings = Vec::new();

    for (line_no, line) in body.lines().enumerate() {
        if fences.is_code(line) {
            continue;
        }
        if let Some(raw) = match_heading(line) {
            headings.push(Heading {
                id: anchors.assign(&raw.text),
                text: raw.text,
                level: raw.level,
                line: line_no,
            });
        }
    }

    headings
}

/// Rewrite `body` so every heading line carries an embedded `<a id>` anchor.
///
/// The ids are exactly those [`extract_headings`] returns for the same body.
/// Existing empty anchors on a heading line are replaced, so annotating twice
/// is stable.
pub fn annotate_anchors(body: &str) -> String {
    let mut anchors = AnchorSet::new();
    let mut fences = FenceTracker::default();
    let mut out = String::with_capacity(body.len() + body.len() / 8);

    for line in body.split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        let ending = &line[content.len()..];

        if !fences.is_code(content) {
            if let Some(raw) = match_heading(content) {
                let id = anchors.assign(&raw.text);
                let hashes = "#".repeat(usize::from(raw.level));
                out.push_str(&format!("{hashes} {} <a id=\"{id}\"></a>", raw.text));
                out.push_str(ending);
                continue;
            }
        }

        out.push_str(line);
    }

    out
}

/// Human-friendly heading text: markdown links reduced to their label, empty
/// HTML anchors removed, entities decoded.
pub fn display_text(raw: &str) -> String {
    let stripped = strip_links_and_anchors(raw);
    decode_html_entities(&stripped).trim().to_string()
}

fn strip_links_and_anchors(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => {
                if let Some((label_end, link_end)) = find_markdown_link(bytes, i) {
                    output.push_str(&input[i + 1..label_end]);
                    i = link_end + 1;
                    continue;
                }
                output.push('[');
                i += 1;
            },
            b'<' => {
                if let Some(next_gt) = memchr::memchr(b'>', &bytes[i + 1..]).map(|pos| pos + i + 1)
                {
                    let tag = input[i + 1..next_gt].trim().to_ascii_lowercase();
                    if tag.starts_with("a ") || tag == "a" || tag.starts_with("/a") {
                        i = next_gt + 1;
                        continue;
                    }
                }
                output.push('<');
                i += 1;
            },
            _ => {
                // Copy the whole UTF-8 sequence starting here.
                let ch_len = input[i..].chars().next().map_or(1, char::len_utf8);
                output.push_str(&input[i..i + ch_len]);
                i += ch_len;
            },
        }
    }

    output
}

fn find_markdown_link(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b']' => {
                if idx + 1 < bytes.len() && bytes[idx + 1] == b'(' {
                    if let Some(close_paren) = find_matching_paren(bytes, idx + 2) {
                        return Some((idx, close_paren));
                    }
                }
                return None;
            },
            _ => idx += 1,
        }
    }
    None
}

fn find_matching_paren(bytes: &[u8], mut pos: usize) -> Option<usize> {
    let mut depth = 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'(' => {
                depth += 1;
                pos += 1;
            },
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
                pos += 1;
            },
            _ => pos += 1,
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_rules() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  What's new?  "), "whats-new");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
        assert_eq!(slugify("__init__ hooks"), "init-hooks");
        assert_eq!(slugify("a _ b"), "a-b");
        assert_eq!(slugify("Tabs\tand   spaces"), "tabs-and-spaces");
        assert_eq!(slugify("--Edge--"), "edge");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify("Café"), "caf");
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let headings = extract_headings("# Test\ntext\n# Test\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].id, "test");
        assert_eq!(headings[1].id, "test-2");
    }

    #[test]
    fn test_suffix_collision_with_literal_heading() {
        let headings = extract_headings("# Test 2\n# Test\n# Test\n");
        let ids: Vec<_> = headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["test-2", "test", "test-3"]);
    }

    #[test]
    fn test_levels_and_lines() {
        let body = "# One\n\n## Two\n\n###### Six\n####### Seven\n";
        let headings = extract_headings(body);
        let levels: Vec<_> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, [1, 2, 6]);
        assert_eq!(headings[1].line, 2);
    }

    #[test]
    fn test_requires_space_after_marker() {
        assert!(extract_headings("#hashtag\n").is_empty());
    }

    #[test]
    fn test_fenced_comments_are_not_headings() {
        let body = "# Setup\n```bash\n# install deps\nnpm i\n```\n## Next\n";
        let ids: Vec<_> = extract_headings(body).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, ["setup", "next"]);
    }

    #[test]
    fn test_closing_hashes_and_links_removed() {
        let headings = extract_headings("## [Signals](./signals.md) ##\n");
        assert_eq!(headings[0].text, "Signals");
        assert_eq!(headings[0].id, "signals");
    }

    #[test]
    fn test_empty_slug_falls_back() {
        let headings = extract_headings("# !!!\n# ???\n");
        assert_eq!(headings[0].id, "section");
        assert_eq!(headings[1].id, "section-2");
    }

    #[test]
    fn test_annotate_matches_extract() {
        let body = "# Intro\n\nText\n\n## Intro\n```md\n# fenced\n```\n";
        let annotated = annotate_anchors(body);
        assert!(annotated.contains("# Intro <a id=\"intro\"></a>\n"));
        assert!(annotated.contains("## Intro <a id=\"intro-2\"></a>\n"));
        assert!(annotated.contains("# fenced\n"));

        let original: Vec<_> = extract_headings(body).into_iter().map(|h| h.id).collect();
        let reparsed: Vec<_> = extract_headings(&annotated)
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let body = "# A\n## B\n# A\n";
        let once = annotate_anchors(body);
        assert_eq!(annotate_anchors(&once), once);
    }

    proptest! {
        #[test]
        fn prop_heading_ids_are_unique(titles in prop::collection::vec("[A-Za-z0-9 _-]{0,12}", 1..40)) {
            let body: String = titles
                .iter()
                .enumerate()
                .map(|(i, t)| format!("{} {}x\n", "#".repeat(i % 6 + 1), t))
                .collect();
            let headings = extract_headings(&body);
            let ids: HashSet<_> = headings.iter().map(|h| h.id.clone()).collect();
            prop_assert_eq!(ids.len(), headings.len());
        }
    }
}
