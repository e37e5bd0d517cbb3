//! Reading-time estimation.
//!
//! Prose is read at a flat words-per-minute rate. Code blocks, inline code,
//! images, list items and table rows add fixed extra minutes because they are
//! slower to take in than their word count suggests. The total is scaled by
//! the reader's skill level.

use crate::code_block::count_fenced_blocks;
use crate::config::ReadingTimeConfig;
use crate::fence::FenceTracker;
use crate::frontmatter::header_len;
use crate::SkillLevel;
use regex::Regex;
use std::sync::LazyLock;

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)|<img\b[^>]*>").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+\S").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static TABLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|?(?:\s*:?-{3,}:?\s*\|)+\s*:?-*:?\s*$").unwrap());

/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());

/// Counted features of a document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    pub words: usize,
    pub code_blocks: usize,
    pub inline_code: usize,
    pub images: usize,
    pub list_items: usize,
    pub table_rows: usize,
}

/// Estimate reading minutes with default constants.
///
/// ```rust
/// use lore_core::{SkillLevel, estimate_reading_time};
///
/// let words = "word ".repeat(400);
/// assert_eq!(estimate_reading_time(&words, None), 2);
/// assert_eq!(estimate_reading_time(&words, Some(SkillLevel::Expert)), 3);
/// assert_eq!(estimate_reading_time("", None), 1);
/// ```
pub fn estimate_reading_time(text: &str, skill: Option<SkillLevel>) -> u32 {
    ReadingTimeEstimator::default().estimate(text, skill)
}

/// Reading-time model with configurable constants.
#[derive(Debug, Clone, Default)]
pub struct ReadingTimeEstimator {
    config: ReadingTimeConfig,
}

impl ReadingTimeEstimator {
    pub const fn new(config: ReadingTimeConfig) -> Self {
        Self { config }
    }

    /// Whole minutes, at least 1.
    ///
    /// `text` may still carry its metadata header; it is ignored.
    pub fn estimate(&self, text: &str, skill: Option<SkillLevel>) -> u32 {
        self.whole_minutes(&analyze(text), skill)
    }

    /// Whole minutes for a body whose header was already removed.
    ///
    /// A leading `---` here is a thematic break, not a header.
    pub fn estimate_body(&self, body: &str, skill: Option<SkillLevel>) -> u32 {
        self.whole_minutes(&analyze_body(body), skill)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn whole_minutes(&self, stats: &ContentStats, skill: Option<SkillLevel>) -> u32 {
        let minutes = self.minutes(stats, skill);
        // Clamped to [1, u32::MAX] before the cast.
        minutes.round().clamp(1.0, f64::from(u32::MAX)) as u32
    }

    /// Unrounded minutes for already-counted content.
    #[allow(clippy::cast_precision_loss)]
    pub fn minutes(&self, stats: &ContentStats, skill: Option<SkillLevel>) -> f64 {
        let c = &self.config;
        let base = if c.words_per_minute > 0.0 {
            stats.words as f64 / c.words_per_minute
        } else {
            0.0
        };
        let extra = stats.code_blocks as f64 * c.code_block_minutes
            + stats.inline_code as f64 * c.inline_code_minutes
            + stats.images as f64 * c.image_minutes
            + stats.list_items as f64 * c.list_item_minutes
            + stats.table_rows as f64 * c.table_row_minutes;

        (base + extra) * c.multiplier(skill)
    }
}

/// Count words and slow-reading features in `text`, skipping its header.
pub fn analyze(text: &str) -> ContentStats {
    analyze_body(&text[header_len(text)..])
}

/// Count words and slow-reading features in a header-free body.
pub fn analyze_body(body: &str) -> ContentStats {
    let mut stats = ContentStats {
        code_blocks: count_fenced_blocks(body),
        ..ContentStats::default()
    };
    let mut fences = FenceTracker::default();

    for line in body.lines() {
        if fences.is_code(line) {
            continue;
        }

        stats.inline_code += INLINE_CODE_RE.find_iter(line).count();
        stats.images += IMAGE_RE.find_iter(line).count();
        if LIST_ITEM_RE.is_match(line) {
            stats.list_items += 1;
        }
        let trimmed = line.trim();
        if trimmed.starts_with('|') && !TABLE_SEPARATOR_RE.is_match(trimmed) {
            stats.table_rows += 1;
        }

        stats.words += count_words(line);
    }

    stats
}

fn count_words(line: &str) -> usize {
    let line = INLINE_CODE_RE.replace_all(line, " ");
    let line = IMAGE_RE.replace_all(&line, " ");
    let line = LINK_RE.replace_all(&line, "$1");
    let line = HTML_TAG_RE.replace_all(&line, " ");

    line.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}
