//! Structural pattern search over indexed code.
//!
//! The catalog is a fixed list of named regexes describing idioms a learner
//! might want to find examples of ("show me every sample using `switchMap`").

use crate::IndexGeneration;
use crate::index::IndexEntry;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};

/// A named code idiom.
#[derive(Debug, Clone, Serialize)]
pub struct CodePattern {
    pub name: &'static str,
    #[serde(serialize_with = "serialize_regex")]
    pub regex: Regex,
    pub category: &'static str,
    /// 0..=5
    pub difficulty: u8,
    pub description: &'static str,
}

fn serialize_regex<S: serde::Serializer>(regex: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(regex.as_str())
}

/// SAFETY: Patterns are compile-time constants that are known to be valid.
#[allow(clippy::unwrap_used)]
static CATALOG: LazyLock<Vec<CodePattern>> = LazyLock::new(|| {
    let specs: [(&str, &str, &str, u8, &str); 12] = [
        (
            "signal-state",
            r"\bsignal\s*(?:<[^>\n]*>)?\s*\(",
            "reactivity",
            1,
            "Writable reactive state created with signal()",
        ),
        (
            "computed-derivation",
            r"\bcomputed\s*(?:<[^>\n]*>)?\s*\(",
            "reactivity",
            2,
            "Derived state recomputed from other signals",
        ),
        (
            "effect-side-effect",
            r"\beffect\s*\(",
            "reactivity",
            3,
            "Side effects that rerun when their signals change",
        ),
        (
            "dependency-injection",
            r"\binject\s*(?:<[^>\n]*>)?\s*\(|constructor\s*\([^)]*\bprivate\b",
            "dependency-injection",
            2,
            "Services obtained through inject() or constructor parameters",
        ),
        (
            "component-decorator",
            r"@Component\s*\(",
            "components",
            1,
            "Class declared as a component",
        ),
        (
            "input-binding",
            r"@Input\s*\(|\binput(?:\.required)?\s*(?:<[^>\n]*>)?\s*\(",
            "components",
            1,
            "Data passed into a component",
        ),
        (
            "output-event",
            r"@Output\s*\(|\boutput\s*(?:<[^>\n]*>)?\s*\(",
            "components",
            2,
            "Events emitted from a component",
        ),
        (
            "standalone-component",
            r"\bstandalone\s*:\s*true\b",
            "components",
            2,
            "Component that declares its own imports",
        ),
        (
            "control-flow-block",
            r"@(?:if|for|switch)\s*\(",
            "templates",
            1,
            "Built-in template control flow",
        ),
        (
            "observable-pipe",
            r"\.pipe\s*\(",
            "rxjs",
            3,
            "Operator chain applied to an observable",
        ),
        (
            "higher-order-mapping",
            r"\b(?:switchMap|mergeMap|concatMap|exhaustMap)\b",
            "rxjs",
            4,
            "Flattening operators that map to inner observables",
        ),
        (
            "async-await",
            r"\bawait\b",
            "async",
            2,
            "Promise-based asynchronous code",
        ),
    ];

    specs
        .into_iter()
        .map(|(name, pattern, category, difficulty, description)| CodePattern {
            name,
            regex: Regex::new(pattern).unwrap(),
            category,
            difficulty,
            description,
        })
        .collect()
});

/// The built-in pattern catalog.
pub fn catalog() -> &'static [CodePattern] {
    &CATALOG
}

/// A catalog pattern found in one entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub pattern: &'static CodePattern,
    pub entry: Arc<IndexEntry>,
    pub count: usize,
}

/// Every (pattern, entry) pair with at least one match, optionally limited to
/// one pattern category. Sorted by match count, then pattern name, then entry
/// id.
pub fn search_patterns(index: &IndexGeneration, category: Option<&str>) -> Vec<PatternMatch> {
    let mut matches = Vec::new();

    for pattern in catalog() {
        if category.is_some_and(|c| !pattern.category.eq_ignore_ascii_case(c)) {
            continue;
        }
        for entry in &index.entries {
            let count = pattern.regex.find_iter(&entry.code).count();
            if count > 0 {
                matches.push(PatternMatch {
                    pattern,
                    entry: Arc::clone(entry),
                    count,
                });
            }
        }
    }

    matches.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.pattern.name.cmp(b.pattern.name))
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });
    matches
}

/// Catalog patterns whose name or description fuzzily matches `query`, best
/// first.
pub fn find_patterns(query: &str) -> Vec<&'static CodePattern> {
    let matcher = SkimMatcherV2::default();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return catalog().iter().collect();
    }

    let mut scored: Vec<(i64, &'static CodePattern)> = catalog()
        .iter()
        .filter_map(|pattern| {
            let by_name = matcher.fuzzy_match(pattern.name, &query);
            // Description matches count for less than name matches.
            let by_description = matcher
                .fuzzy_match(&pattern.description.to_lowercase(), &query)
                .map(|score| score / 2);
            by_name.max(by_description).map(|score| (score, pattern))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(b.1.name)));
    scored.into_iter().map(|(_, pattern)| pattern).collect()
}
