//! Code sample indexing.
//!
//! [`build_index`] turns a corpus of [`CodeSample`]s into an
//! [`IndexGeneration`]: one immutable [`IndexEntry`] per valid sample, ranked
//! by weight, plus corpus statistics. A sample that fails validation is logged
//! and skipped; the build itself never fails.

mod export;
mod stats;

pub use export::{EXPORT_VERSION, IndexExport};
pub use stats::{IndexStats, PatternCount};

use crate::utils::round1;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

/// Days within which a sample earns a recency bonus.
const RECENCY_WINDOW_DAYS: f64 = 30.0;
const MAX_RECENCY_BONUS: f64 = 0.5;

/// A named structural pattern whose first capture group becomes a keyword.
pub(crate) struct StructuralPattern {
    pub name: &'static str,
    pub regex: Regex,
}

/// SAFETY: Patterns are compile-time constants that are known to be valid.
#[allow(clippy::unwrap_used)]
pub(crate) static STRUCTURAL_PATTERNS: LazyLock<Vec<StructuralPattern>> = LazyLock::new(|| {
    [
        ("decorator", r"(@[A-Z][A-Za-z0-9]*)\b"),
        ("reactive_primitive", r"\b(signal|computed|effect)\s*(?:<[^>\n]*>)?\s*\("),
        ("typed_collection", r"\b(Array|Map|Set|ReadonlyArray)\s*<"),
        ("async", r"\b(async)\s+(?:fn|function)\b"),
        ("observable", r"\b(Observable)\s*<"),
        ("injection", r"\b(inject)\s*(?:<[^>\n]*>)?\s*\("),
        ("interface", r"\binterface\s+([A-Z]\w*)"),
        ("class", r"\bclass\s+([A-Z]\w*)"),
    ]
    .into_iter()
    .map(|(name, pattern)| StructuralPattern {
        name,
        regex: Regex::new(pattern).unwrap(),
    })
    .collect()
});

/// Constructs that make a sample harder to follow.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static COMPLEX_PATTERN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:switchMap|mergeMap|concatMap|exhaustMap|combineLatest|forkJoin)\b",
        r"|\.pipe\s*\(",
        r"|\bawait\b",
        r"|\btry\s*\{",
        r"|<[^<>\n]*<[^<>\n]*>[^<>\n]*>",
        r"|\?\.",
        r"|\b(?:impl|where|dyn)\b",
    ))
    .unwrap()
});

/// A code sample as supplied to the index builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSample {
    pub id: String,
    pub title: String,
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// 0..=5
    #[serde(default)]
    pub difficulty: u8,
    /// 0.0..=1.0
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub concept_path: String,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_constitutional: bool,
}

/// A decoded sample corpus plus the count of elements that did not decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBatch {
    pub samples: Vec<CodeSample>,
    /// Elements dropped before indexing; counted as skipped by the build.
    pub rejected: usize,
}

impl SampleBatch {
    /// Decode a JSON array of samples one element at a time.
    ///
    /// An element with a missing field or an out-of-range value is logged and
    /// counted in `rejected`; the rest still decode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when `json` is not a JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut batch = Self {
            samples: Vec::with_capacity(values.len()),
            rejected: 0,
        };

        for (position, value) in values.into_iter().enumerate() {
            let id = value.get("id").and_then(serde_json::Value::as_str).map(str::to_owned);
            match serde_json::from_value::<CodeSample>(value) {
                Ok(sample) => batch.samples.push(sample),
                Err(err) => {
                    batch.rejected += 1;
                    warn!(position, id = id.as_deref().unwrap_or("?"), "skipping undecodable sample: {err}");
                },
            }
        }
        Ok(batch)
    }
}

impl From<Vec<CodeSample>> for SampleBatch {
    fn from(samples: Vec<CodeSample>) -> Self {
        Self { samples, rejected: 0 }
    }
}

/// Searchable form of one code sample. Never mutated after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub title: String,
    pub code: String,
    pub keywords: BTreeSet<String>,
    /// Lowercased title, code, categories, tags and language.
    pub searchable_text: String,
    pub weight: f64,
    pub complexity: f64,
    pub line_count: usize,
    pub concept_path: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub language: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub difficulty: u8,
    pub is_constitutional: bool,
}

/// One published index snapshot.
#[derive(Debug, Clone)]
pub struct IndexGeneration {
    /// Increases by one with every publication from the same service.
    pub generation: u64,
    /// Ranked by descending weight, ties by id.
    pub entries: Vec<Arc<IndexEntry>>,
    pub stats: IndexStats,
    pub generated_at: DateTime<Utc>,
}

impl IndexGeneration {
    /// An empty generation 0.
    pub fn empty() -> Self {
        Self {
            generation: 0,
            entries: Vec::new(),
            stats: IndexStats::default(),
            generated_at: Utc::now(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<IndexEntry>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build generation 1 from `samples` as of now.
///
/// ```rust
/// use lore_core::{CodeSample, build_index};
///
/// let sample = CodeSample {
///     id: "counter".into(),
///     title: "Counter".into(),
///     code: "const count = signal(0);".into(),
///     language: "TypeScript".into(),
///     categories: vec!["reactivity".into()],
///     tags: vec![],
///     difficulty: 1,
///     popularity: 0.5,
///     concept_path: "signals/basics".into(),
///     last_modified: None,
///     is_constitutional: false,
/// };
///
/// let index = build_index(&[sample]);
/// assert_eq!(index.entries.len(), 1);
/// assert!(index.entries[0].keywords.contains("signal"));
/// assert!(index.entries[0].keywords.contains("typescript"));
/// ```
pub fn build_index(samples: &[CodeSample]) -> IndexGeneration {
    build_index_at(samples, Utc::now(), 1)
}

/// Build a generation with an explicit clock and generation number.
pub fn build_index_at(samples: &[CodeSample], now: DateTime<Utc>, generation: u64) -> IndexGeneration {
    build_generation(samples, 0, now, generation)
}

/// Build a generation from a decoded batch; its rejected elements count as
/// skipped.
pub fn build_batch_at(batch: &SampleBatch, now: DateTime<Utc>, generation: u64) -> IndexGeneration {
    build_generation(&batch.samples, batch.rejected, now, generation)
}

fn build_generation(
    samples: &[CodeSample],
    rejected: usize,
    now: DateTime<Utc>,
    generation: u64,
) -> IndexGeneration {
    let mut entries = Vec::with_capacity(samples.len());
    let mut skipped = rejected;

    for sample in samples {
        match build_entry(sample, now) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                skipped += 1;
                warn!(category = err.category(), "{err}");
            },
        }
    }

    entries.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));
    let stats = IndexStats::collect(&entries, skipped);
    let entries: Vec<Arc<IndexEntry>> = entries.into_iter().map(Arc::new).collect();

    info!(generation, entries = entries.len(), skipped, "built index generation");
    IndexGeneration {
        generation,
        entries,
        stats,
        generated_at: now,
    }
}

/// Validate and index a single sample.
///
/// # Errors
///
/// Returns [`Error::BuildEntry`] when the id or code is empty, difficulty is
/// above 5, or popularity is outside `0.0..=1.0`.
pub fn build_entry(sample: &CodeSample, now: DateTime<Utc>) -> Result<IndexEntry> {
    validate(sample)?;

    let line_count = sample.code.lines().count();
    let keywords = extract_keywords(sample);
    let searchable_text = searchable_text(sample);
    let weight = compute_weight(sample, line_count, now);
    let complexity = compute_complexity(&sample.code, line_count);

    debug!(id = %sample.id, weight, complexity, keywords = keywords.len(), "indexed sample");
    Ok(IndexEntry {
        id: sample.id.clone(),
        title: sample.title.clone(),
        code: sample.code.clone(),
        keywords,
        searchable_text,
        weight,
        complexity,
        line_count,
        concept_path: sample.concept_path.clone(),
        last_modified: sample.last_modified,
        language: sample.language.to_lowercase(),
        categories: sample.categories.clone(),
        tags: sample.tags.clone(),
        difficulty: sample.difficulty,
        is_constitutional: sample.is_constitutional,
    })
}

fn validate(sample: &CodeSample) -> Result<()> {
    let reject = |reason: &str| Error::BuildEntry {
        id: sample.id.clone(),
        reason: reason.to_string(),
    };

    if sample.id.trim().is_empty() {
        return Err(reject("empty id"));
    }
    if sample.code.trim().is_empty() {
        return Err(reject("empty code"));
    }
    if sample.difficulty > 5 {
        return Err(reject(&format!("difficulty {} is above 5", sample.difficulty)));
    }
    if !sample.popularity.is_finite() || !(0.0..=1.0).contains(&sample.popularity) {
        return Err(reject(&format!(
            "popularity {} is outside 0..=1",
            sample.popularity
        )));
    }
    Ok(())
}

/// Language, categories, tags and structural markers, all lowercased.
pub fn extract_keywords(sample: &CodeSample) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();

    let language = sample.language.trim().to_lowercase();
    if !language.is_empty() {
        keywords.insert(language);
    }
    for declared in sample.categories.iter().chain(&sample.tags) {
        let declared = declared.trim().to_lowercase();
        if !declared.is_empty() {
            keywords.insert(declared);
        }
    }
    for pattern in STRUCTURAL_PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(&sample.code) {
            if let Some(found) = caps.get(1) {
                keywords.insert(found.as_str().to_lowercase());
            }
        }
    }

    keywords
}

fn searchable_text(sample: &CodeSample) -> String {
    let mut parts: Vec<&str> = vec![&sample.title, &sample.code];
    parts.extend(sample.categories.iter().map(String::as_str));
    parts.extend(sample.tags.iter().map(String::as_str));
    parts.push(&sample.language);
    parts.join(" ").to_lowercase()
}

/// `1 + difficulty·0.2 + popularity·0.3 + recency + min(lines/50, 1)·0.3`,
/// rounded to one decimal.
#[allow(clippy::cast_precision_loss)]
pub fn compute_weight(sample: &CodeSample, line_count: usize, now: DateTime<Utc>) -> f64 {
    let length_factor = (line_count as f64 / 50.0).min(1.0);
    round1(
        1.0 + f64::from(sample.difficulty) * 0.2
            + sample.popularity * 0.3
            + recency_bonus(sample.last_modified, now)
            + length_factor * 0.3,
    )
}

/// Linear decay from 0.5 at age zero to 0 at the end of the window. Future
/// timestamps count as age zero.
#[allow(clippy::cast_precision_loss)]
pub fn recency_bonus(last_modified: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(modified) = last_modified else {
        return 0.0;
    };
    let age_days = ((now - modified).num_seconds() as f64 / 86_400.0).max(0.0);
    if age_days >= RECENCY_WINDOW_DAYS {
        0.0
    } else {
        MAX_RECENCY_BONUS * (1.0 - age_days / RECENCY_WINDOW_DAYS)
    }
}

/// `1 + min(lines/10, 5) + nesting·0.5 + complex_matches·0.3`, rounded to one
/// decimal.
#[allow(clippy::cast_precision_loss)]
pub fn compute_complexity(code: &str, line_count: usize) -> f64 {
    let size = (line_count as f64 / 10.0).min(5.0);
    let nesting = nesting_depth(code) as f64;
    let complex = COMPLEX_PATTERN_RE.find_iter(code).count() as f64;
    round1(1.0 + size + nesting * 0.5 + complex * 0.3)
}

/// Deepest bracket nesting. Unbalanced closers are ignored.
pub fn nesting_depth(code: &str) -> usize {
    let mut depth: usize = 0;
    let mut max = 0;
    for byte in code.bytes() {
        match byte {
            b'(' | b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            },
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {},
        }
    }
    max
}
