//! Corpus statistics gathered while building an index.

use super::{IndexEntry, STRUCTURAL_PATTERNS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Patterns reported in [`IndexStats::top_patterns`].
const MAX_TOP_PATTERNS: usize = 10;

/// Aggregate numbers for one index generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_entries: usize,
    /// Samples rejected during the build.
    pub skipped: usize,
    pub by_language: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub by_difficulty: BTreeMap<u8, usize>,
    pub average_complexity: f64,
    /// Most frequent structural patterns, most common first.
    pub top_patterns: Vec<PatternCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub name: String,
    pub count: usize,
}

impl IndexStats {
    pub(crate) fn collect(entries: &[IndexEntry], skipped: usize) -> Self {
        let mut stats = Self {
            total_entries: entries.len(),
            skipped,
            ..Self::default()
        };
        let mut patterns: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut complexity_sum = 0.0;

        for entry in entries {
            *stats.by_language.entry(entry.language.clone()).or_default() += 1;
            for category in &entry.categories {
                *stats.by_category.entry(category.to_lowercase()).or_default() += 1;
            }
            *stats.by_difficulty.entry(entry.difficulty).or_default() += 1;
            complexity_sum += entry.complexity;

            for pattern in STRUCTURAL_PATTERNS.iter() {
                let hits = pattern.regex.find_iter(&entry.code).count();
                if hits > 0 {
                    *patterns.entry(pattern.name).or_default() += hits;
                }
            }
        }

        if !entries.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let count = entries.len() as f64;
            stats.average_complexity = crate::utils::round1(complexity_sum / count);
        }

        let mut ranked: Vec<PatternCount> = patterns
            .into_iter()
            .map(|(name, count)| PatternCount {
                name: name.to_string(),
                count,
            })
            .collect();
        // Stable sort keeps name order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(MAX_TOP_PATTERNS);
        stats.top_patterns = ranked;

        stats
    }
}
