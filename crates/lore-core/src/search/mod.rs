//! Relevance search over an [`IndexGeneration`].
//!
//! ## Scoring
//!
//! For a lowercased query `q` with terms `t` (whitespace tokens longer than
//! two characters):
//!
//! | Signal | Points |
//! |--------|--------|
//! | title contains `q` | 10 |
//! | each `t` found in the searchable text (substring or fuzzy) | 5 |
//! | each keyword containing `q` or any `t` | 3 |
//! | entry weight | 0.5 × weight |
//!
//! The total is divided by 20 and capped at 1.0. Entries that match nothing
//! are never returned, whatever their weight.
//!
//! ## Ordering
//!
//! Descending score, then constitutional entries first, then title
//! (case-insensitive, then exact), then id. The same index and query always
//! produce the same order.

mod fuzzy;
mod patterns;
mod related;

pub use fuzzy::{MIN_FUZZY_WORD_CHARS, candidate_words, fuzzy_find, levenshtein, similarity};
pub use patterns::{CodePattern, PatternMatch, catalog, find_patterns, search_patterns};
pub use related::{RelatedEntry, entry_similarity, find_related};

use crate::config::SearchConfig;
use crate::index::IndexEntry;
use crate::utils::{context_window, safe_truncate};
use crate::{IndexGeneration, SkillLevel};
use html_escape::encode_text;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

const TITLE_POINTS: f64 = 10.0;
const TERM_POINTS: f64 = 5.0;
const KEYWORD_POINTS: f64 = 3.0;
const WEIGHT_FACTOR: f64 = 0.5;
const SCORE_SCALE: f64 = 20.0;

/// Terms must be longer than this many characters.
const MIN_TERM_CHARS: usize = 2;

/// Bytes of code kept on each side of the first match in a highlight.
const HIGHLIGHT_RADIUS: usize = 60;
/// Snippet length when the code itself has no match.
const HIGHLIGHT_FALLBACK_BYTES: usize = 120;

/// Learner-facing constraints on which entries may match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilter {
    /// Used when the query argument to [`search`] is blank.
    pub query: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub languages: Vec<String>,
    pub skill_levels: Vec<SkillLevel>,
    /// Inclusive difficulty bounds.
    pub difficulty_range: Option<(u8, u8)>,
}

/// Engine-level search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    pub max_results: usize,
    pub min_score: f64,
    pub languages: Vec<String>,
    pub categories: Vec<String>,
    /// Prefixes matched on `/` boundaries: `signals` covers `signals/basics`.
    pub concept_paths: Vec<String>,
    pub fuzzy: bool,
    pub fuzzy_threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl SearchOptions {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_results: config.max_results,
            min_score: config.min_score,
            languages: Vec::new(),
            categories: Vec::new(),
            concept_paths: Vec::new(),
            fuzzy: true,
            fuzzy_threshold: config.fuzzy_threshold,
        }
    }
}

/// How an entry matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The title contains the whole query.
    Exact,
    /// Some term or keyword matched by substring.
    Partial,
    /// Only approximate word matches contributed.
    Fuzzy,
}

/// One ranked hit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub entry: Arc<IndexEntry>,
    /// 0.0..=1.0
    pub relevance_score: f64,
    pub match_type: MatchType,
    /// HTML-escaped code snippet with matches wrapped in `<mark>`.
    pub highlighted_content: String,
}

/// Results sharing a language or category.
#[derive(Debug, Clone, Serialize)]
pub struct ResultGroup {
    pub key: String,
    pub items: Vec<SearchResultItem>,
}

/// Lowercased query and its scoring terms.
struct ParsedQuery {
    full: String,
    terms: Vec<String>,
}

impl ParsedQuery {
    fn new(raw: &str) -> Self {
        let full = raw.trim().to_lowercase();
        let terms = full
            .split_whitespace()
            .filter(|t| t.chars().count() > MIN_TERM_CHARS)
            .map(str::to_string)
            .collect();
        Self { full, terms }
    }
}

/// Per-entry scoring outcome before normalization.
struct Scored {
    points: f64,
    match_type: MatchType,
    /// Words to highlight in the code.
    highlights: Vec<String>,
}

/// Rank entries of `index` against `query`.
///
/// A blank `query` falls back to `filter.query`; if that is blank too the
/// result is empty.
///
/// ```rust
/// use lore_core::search::{MatchType, SearchFilter, SearchOptions, search};
/// use lore_core::{CodeSample, build_index};
///
/// let index = build_index(&[CodeSample {
///     id: "sig".into(),
///     title: "Signal counter".into(),
///     code: "const count = signal(0);".into(),
///     language: "typescript".into(),
///     categories: vec![],
///     tags: vec![],
///     difficulty: 1,
///     popularity: 0.2,
///     concept_path: "signals".into(),
///     last_modified: None,
///     is_constitutional: false,
/// }]);
///
/// let hits = search(&index, "signal", &SearchFilter::default(), &SearchOptions::default());
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].match_type, MatchType::Exact);
/// assert!(hits[0].highlighted_content.contains("<mark>signal</mark>"));
/// ```
pub fn search(
    index: &IndexGeneration,
    query: &str,
    filter: &SearchFilter,
    options: &SearchOptions,
) -> Vec<SearchResultItem> {
    let raw = if query.trim().is_empty() { filter.query.as_str() } else { query };
    let parsed = ParsedQuery::new(raw);
    if parsed.full.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResultItem> = index
        .entries
        .iter()
        .filter(|entry| passes_options(entry, options) && passes_filter(entry, filter))
        .filter_map(|entry| {
            let scored = score_entry(entry, &parsed, options)?;
            let relevance_score = (scored.points / SCORE_SCALE).min(1.0);
            (relevance_score >= options.min_score).then(|| SearchResultItem {
                highlighted_content: highlight(&entry.code, &scored.highlights),
                entry: Arc::clone(entry),
                relevance_score,
                match_type: scored.match_type,
            })
        })
        .collect();

    results.sort_by(compare_results);
    results.truncate(options.max_results);

    debug!(
        query = %parsed.full,
        terms = parsed.terms.len(),
        results = results.len(),
        generation = index.generation,
        "search complete"
    );
    results
}

fn score_entry(entry: &IndexEntry, query: &ParsedQuery, options: &SearchOptions) -> Option<Scored> {
    let mut points = 0.0;
    let mut highlights = Vec::new();

    let title_hit = entry.title.to_lowercase().contains(&query.full);
    if title_hit {
        points += TITLE_POINTS;
        highlights.push(query.full.clone());
    }

    let mut substring_hit = false;
    let mut fuzzy_hit = false;
    for term in &query.terms {
        if entry.searchable_text.contains(term.as_str()) {
            points += TERM_POINTS;
            substring_hit = true;
            highlights.push(term.clone());
        } else if options.fuzzy {
            if let Some(word) = fuzzy_find(&entry.searchable_text, term, options.fuzzy_threshold) {
                points += TERM_POINTS;
                fuzzy_hit = true;
                highlights.push(word.to_string());
            }
        }
    }

    let keyword_hits = entry
        .keywords
        .iter()
        .filter(|kw| kw.contains(&query.full) || query.terms.iter().any(|t| kw.contains(t.as_str())))
        .count();
    if keyword_hits > 0 {
        substring_hit = true;
    }
    #[allow(clippy::cast_precision_loss)]
    {
        points += keyword_hits as f64 * KEYWORD_POINTS;
    }

    let match_type = if title_hit {
        MatchType::Exact
    } else if substring_hit {
        MatchType::Partial
    } else if fuzzy_hit {
        MatchType::Fuzzy
    } else {
        return None;
    };

    points += entry.weight * WEIGHT_FACTOR;
    Some(Scored {
        points,
        match_type,
        highlights,
    })
}

fn compare_results(a: &SearchResultItem, b: &SearchResultItem) -> Ordering {
    b.relevance_score
        .total_cmp(&a.relevance_score)
        .then_with(|| b.entry.is_constitutional.cmp(&a.entry.is_constitutional))
        .then_with(|| a.entry.title.to_lowercase().cmp(&b.entry.title.to_lowercase()))
        .then_with(|| a.entry.title.cmp(&b.entry.title))
        .then_with(|| a.entry.id.cmp(&b.entry.id))
}

fn any_eq_ignore_case(wanted: &[String], values: &[String]) -> bool {
    wanted
        .iter()
        .any(|w| values.iter().any(|v| v.eq_ignore_ascii_case(w)))
}

fn passes_options(entry: &IndexEntry, options: &SearchOptions) -> bool {
    (options.languages.is_empty()
        || options.languages.iter().any(|l| l.eq_ignore_ascii_case(&entry.language)))
        && (options.categories.is_empty() || any_eq_ignore_case(&options.categories, &entry.categories))
        && (options.concept_paths.is_empty()
            || options
                .concept_paths
                .iter()
                .any(|prefix| is_path_prefix(prefix, &entry.concept_path)))
}

fn passes_filter(entry: &IndexEntry, filter: &SearchFilter) -> bool {
    let in_range = filter
        .difficulty_range
        .is_none_or(|(lo, hi)| (lo..=hi).contains(&entry.difficulty));
    let in_band = filter.skill_levels.is_empty()
        || filter.skill_levels.iter().any(|level| {
            let (lo, hi) = level.difficulty_band();
            (lo..=hi).contains(&entry.difficulty)
        });

    (filter.languages.is_empty()
        || filter.languages.iter().any(|l| l.eq_ignore_ascii_case(&entry.language)))
        && (filter.categories.is_empty() || any_eq_ignore_case(&filter.categories, &entry.categories))
        && (filter.tags.is_empty() || any_eq_ignore_case(&filter.tags, &entry.tags))
        && in_band
        && in_range
}

fn is_path_prefix(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Escaped snippet around the first highlighted word, with every highlighted
/// word inside it wrapped in `<mark>`.
fn highlight(code: &str, words: &[String]) -> String {
    let alternatives: Vec<String> = words
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| regex::escape(w))
        .collect();
    let regex = (!alternatives.is_empty())
        .then(|| {
            RegexBuilder::new(&alternatives.join("|"))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .flatten();

    let Some(regex) = regex else {
        return encode_text(safe_truncate(code, HIGHLIGHT_FALLBACK_BYTES)).into_owned();
    };
    let Some(first) = regex.find(code) else {
        return encode_text(safe_truncate(code, HIGHLIGHT_FALLBACK_BYTES)).into_owned();
    };

    let snippet = context_window(code, first.start(), first.len(), HIGHLIGHT_RADIUS);
    let mut out = String::with_capacity(snippet.len() + 32);
    let mut last = 0;
    for found in regex.find_iter(snippet) {
        out.push_str(&encode_text(&snippet[last..found.start()]));
        out.push_str("<mark>");
        out.push_str(&encode_text(found.as_str()));
        out.push_str("</mark>");
        last = found.end();
    }
    out.push_str(&encode_text(&snippet[last..]));
    out
}

/// Group results by entry language, groups ordered by their best result.
pub fn group_by_language(results: &[SearchResultItem]) -> Vec<ResultGroup> {
    group_by(results, |item| vec![item.entry.language.clone()])
}

/// Group results by category; an entry appears in each of its categories and
/// uncategorized entries land in `uncategorized`.
pub fn group_by_category(results: &[SearchResultItem]) -> Vec<ResultGroup> {
    group_by(results, |item| {
        if item.entry.categories.is_empty() {
            vec!["uncategorized".to_string()]
        } else {
            item.entry.categories.iter().map(|c| c.to_lowercase()).collect()
        }
    })
}

fn group_by<F>(results: &[SearchResultItem], keys: F) -> Vec<ResultGroup>
where
    F: Fn(&SearchResultItem) -> Vec<String>,
{
    let mut groups: Vec<ResultGroup> = Vec::new();
    for item in results {
        for key in keys(item) {
            match groups.iter_mut().find(|g| g.key == key) {
                Some(group) => group.items.push(item.clone()),
                None => groups.push(ResultGroup {
                    key,
                    items: vec![item.clone()],
                }),
            }
        }
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::index::build_index_at;
    use crate::index::tests::{now, sample};
    use crate::CodeSample;

    fn titled(id: &str, title: &str, code: &str) -> CodeSample {
        let mut s = sample(id, code);
        s.title = title.to_string();
        s
    }

    fn run(index: &IndexGeneration, query: &str) -> Vec<SearchResultItem> {
        search(index, query, &SearchFilter::default(), &SearchOptions::default())
    }

    #[test]
    fn test_score_formula() {
        // Title hit 10 + term 5 + keyword "signal" 3 + weight 1.0 * 0.5 = 18.5 -> 0.925
        let index = build_index_at(&[titled("a", "Signal basics", "const c = signal(0);")], now(), 1);
        let hits = run(&index, "signal");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].match_type, MatchType::Exact);
        assert!((hits[0].relevance_score - 0.925).abs() < 1e-9);
    }

    #[test]
    fn test_scores_are_capped() {
        let mut s = titled("a", "signal signal", "signal(0); signal(1);");
        s.tags = vec!["signal".into(), "signal-state".into(), "signals".into()];
        let index = build_index_at(&[s], now(), 1);
        let hits = run(&index, "signal signal");
        assert!((hits[0].relevance_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_and_fuzzy_match_types() {
        let index = build_index_at(
            &[
                titled("p", "Counter", "const total = computed(() => a + b);"),
                titled("f", "Other", "const total = sum(a, b);"),
            ],
            now(),
            1,
        );

        let hits = run(&index, "computed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entry.id, "p");
        assert_eq!(hits[0].match_type, MatchType::Partial);

        let hits = run(&index, "totl");
        assert!(hits.iter().all(|h| h.match_type == MatchType::Fuzzy));
        assert_eq!(hits.len(), 2);
        assert!(hits[0].highlighted_content.contains("<mark>total</mark>"));
    }

    #[test]
    fn test_fuzzy_can_be_disabled() {
        let index = build_index_at(&[titled("f", "Other", "const total = 1;")], now(), 1);
        let options = SearchOptions {
            fuzzy: false,
            ..SearchOptions::default()
        };
        assert!(search(&index, "totl", &SearchFilter::default(), &options).is_empty());
    }

    #[test]
    fn test_unmatched_entries_never_returned() {
        let mut heavy = titled("h", "Heavy", "x");
        heavy.difficulty = 5;
        heavy.popularity = 1.0;
        let index = build_index_at(&[heavy], now(), 1);
        let options = SearchOptions {
            min_score: 0.0,
            ..SearchOptions::default()
        };
        assert!(search(&index, "router", &SearchFilter::default(), &options).is_empty());
    }

    #[test]
    fn test_blank_query_uses_filter_query() {
        let index = build_index_at(&[titled("a", "Forms", "form.value")], now(), 1);
        assert!(run(&index, "   ").is_empty());

        let filter = SearchFilter {
            query: "forms".into(),
            ..SearchFilter::default()
        };
        assert_eq!(search(&index, "", &filter, &SearchOptions::default()).len(), 1);
    }

    #[test]
    fn test_tie_break_order() {
        let mut constitutional = titled("z", "beta", "signal");
        constitutional.is_constitutional = true;
        let index = build_index_at(
            &[
                titled("b", "Alpha", "signal"),
                titled("a", "alpha", "signal"),
                titled("c", "Alpha", "signal"),
                constitutional,
            ],
            now(),
            1,
        );
        let ids: Vec<_> = run(&index, "signal").iter().map(|h| h.entry.id.clone()).collect();
        // Equal scores: constitutional first, then "Alpha" < "alpha" raw, then id.
        assert_eq!(ids, ["z", "b", "c", "a"]);
    }

    #[test]
    fn test_results_are_deterministic() {
        let samples: Vec<CodeSample> = (0..20)
            .map(|i| titled(&format!("s{i:02}"), &format!("Sample {}", i % 3), "const v = signal(1);"))
            .collect();
        let first = build_index_at(&samples, now(), 1);
        let second = build_index_at(&samples, now(), 1);

        let a: Vec<_> = run(&first, "signal sample").iter().map(|h| h.entry.id.clone()).collect();
        let b: Vec<_> = run(&second, "signal sample").iter().map(|h| h.entry.id.clone()).collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn test_filters_apply_before_scoring() {
        let mut hard = titled("hard", "Signal expert", "signal(1)");
        hard.difficulty = 5;
        hard.tags = vec!["advanced".into()];
        hard.concept_path = "signals/internals".into();
        let mut easy = titled("easy", "Signal intro", "signal(1)");
        easy.difficulty = 1;
        easy.language = "javascript".into();
        easy.concept_path = "signalsish".into();
        let index = build_index_at(&[hard, easy], now(), 1);

        let ids = |filter: SearchFilter, options: SearchOptions| -> Vec<String> {
            search(&index, "signal", &filter, &options)
                .into_iter()
                .map(|h| h.entry.id.clone())
                .collect()
        };

        let by_level = SearchFilter {
            skill_levels: vec![SkillLevel::Fundamentals],
            ..SearchFilter::default()
        };
        assert_eq!(ids(by_level, SearchOptions::default()), ["easy"]);

        let by_range = SearchFilter {
            difficulty_range: Some((4, 5)),
            ..SearchFilter::default()
        };
        assert_eq!(ids(by_range, SearchOptions::default()), ["hard"]);

        let by_tag = SearchFilter {
            tags: vec!["ADVANCED".into()],
            ..SearchFilter::default()
        };
        assert_eq!(ids(by_tag, SearchOptions::default()), ["hard"]);

        let by_language = SearchOptions {
            languages: vec!["JavaScript".into()],
            ..SearchOptions::default()
        };
        assert_eq!(ids(SearchFilter::default(), by_language), ["easy"]);

        let by_path = SearchOptions {
            concept_paths: vec!["signals/".into()],
            ..SearchOptions::default()
        };
        assert_eq!(ids(SearchFilter::default(), by_path), ["hard"]);
    }

    #[test]
    fn test_max_results_truncates() {
        let samples: Vec<CodeSample> = (0..5).map(|i| titled(&format!("{i}"), "Signal", "signal()")).collect();
        let index = build_index_at(&samples, now(), 1);
        let options = SearchOptions {
            max_results: 2,
            ..SearchOptions::default()
        };
        assert_eq!(search(&index, "signal", &SearchFilter::default(), &options).len(), 2);
    }

    #[test]
    fn test_highlight_escapes_markup() {
        let out = highlight("<div>{{ count() }}</div>", &["count".to_string()]);
        assert_eq!(out, "&lt;div&gt;{{ <mark>count</mark>() }}&lt;/div&gt;");
    }

    #[test]
    fn test_highlight_without_code_match_uses_prefix() {
        let code = "x".repeat(500);
        assert_eq!(highlight(&code, &["title".to_string()]).len(), HIGHLIGHT_FALLBACK_BYTES);
        assert_eq!(highlight("abc", &[]), "abc");
    }

    #[test]
    fn test_grouping() {
        let mut js = titled("js", "Signal js", "signal()");
        js.language = "javascript".into();
        js.categories = vec!["Reactivity".into(), "components".into()];
        let mut bare = titled("bare", "Signal bare", "signal()");
        bare.categories = Vec::new();
        let index = build_index_at(&[titled("ts", "Signal ts", "signal()"), js, bare], now(), 1);
        let hits = run(&index, "signal");

        let by_language = group_by_language(&hits);
        let keys: Vec<_> = by_language.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"typescript") && keys.contains(&"javascript"));

        let by_category = group_by_category(&hits);
        let components = by_category.iter().find(|g| g.key == "components").unwrap();
        assert_eq!(components.items.len(), 2);
        assert!(by_category.iter().any(|g| g.key == "uncategorized"));
        assert!(by_category.iter().any(|g| g.key == "reactivity"));
    }
}
