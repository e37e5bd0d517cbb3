//! Entry-to-entry similarity.

use crate::IndexGeneration;
use crate::index::IndexEntry;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

const LANGUAGE_WEIGHT: f64 = 0.3;
const CATEGORY_WEIGHT: f64 = 0.4;
const KEYWORD_WEIGHT: f64 = 0.3;

/// An entry judged similar to another.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedEntry {
    pub entry: Arc<IndexEntry>,
    pub similarity: f64,
}

/// Similarity of two entries in `0.0..=1.0`.
///
/// Same language scores 0.3; shared categories add up to 0.4 and shared
/// keywords up to 0.3, each as the overlap over the larger set.
#[allow(clippy::cast_precision_loss)]
pub fn entry_similarity(a: &IndexEntry, b: &IndexEntry) -> f64 {
    let mut score = 0.0;
    if a.language.eq_ignore_ascii_case(&b.language) {
        score += LANGUAGE_WEIGHT;
    }

    let cats_a = folded(&a.categories);
    let cats_b = folded(&b.categories);
    let shared = cats_a.intersection(&cats_b).count();
    score += CATEGORY_WEIGHT * shared as f64 / cats_a.len().max(cats_b.len()).max(1) as f64;

    let shared = a.keywords.intersection(&b.keywords).count();
    score += KEYWORD_WEIGHT * shared as f64 / a.keywords.len().max(b.keywords.len()).max(1) as f64;

    score
}

fn folded(values: &[String]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

/// Entries more similar than `threshold` to the entry with `id`, most similar
/// first, excluding the entry itself. Empty if `id` is unknown.
pub fn find_related(index: &IndexGeneration, id: &str, threshold: f64, limit: usize) -> Vec<RelatedEntry> {
    let Some(target) = index.get(id) else {
        return Vec::new();
    };

    let mut related: Vec<RelatedEntry> = index
        .entries
        .iter()
        .filter(|entry| entry.id != target.id)
        .map(|entry| RelatedEntry {
            similarity: entry_similarity(target, entry),
            entry: Arc::clone(entry),
        })
        .filter(|r| r.similarity > threshold)
        .collect();

    related.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });
    related.truncate(limit);
    related
}
