//! Glossary term detection in prose.
//!
//! A [`Glossary`] is a controlled list of terms, each with alternative
//! keywords. Detection is a case-insensitive whole-word scan; each hit gets a
//! confidence score that rewards exact casing and code-looking surroundings.

use crate::config::VocabularyConfig;
use crate::utils::{context_window, line_column};
use crate::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Bytes of text kept on each side of a match in [`VocabularyMatch::context`].
const CONTEXT_RADIUS: usize = 40;

/// Characters that suggest a term is used as code.
const CODE_MARKERS: &[char] = &['@', '(', ')', '{', '}', '[', ']'];

/// One glossary term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
    /// Alternative spellings that count as this term.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
}

/// A controlled vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glossary {
    pub entries: Vec<GlossaryEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GlossaryFile {
    List(Vec<GlossaryEntry>),
    Wrapped { entries: Vec<GlossaryEntry> },
}

impl Glossary {
    pub const fn new(entries: Vec<GlossaryEntry>) -> Self {
        Self { entries }
    }

    /// Parse a glossary from JSON: either a bare array of entries or an
    /// object with an `entries` array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the JSON does not describe a
    /// glossary.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: GlossaryFile = serde_json::from_str(json)
            .map_err(|e| Error::Serialization(format!("invalid glossary: {e}")))?;
        let entries = match file {
            GlossaryFile::List(entries) | GlossaryFile::Wrapped { entries } => entries,
        };
        Ok(Self { entries })
    }

    /// Entry whose term or keyword equals `name`, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&GlossaryEntry> {
        let name = name.trim();
        self.entries.iter().find(|entry| {
            entry.term.eq_ignore_ascii_case(name)
                || entry.keywords.iter().any(|k| k.eq_ignore_ascii_case(name))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A glossary term found in text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyMatch {
    /// Canonical glossary term.
    pub term: String,
    /// Text as it appears in the document.
    pub matched_text: String,
    pub definition: String,
    pub category: Option<String>,
    pub confidence: f64,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub column: usize,
    /// Byte offset into the scanned text.
    pub offset: usize,
    pub context: String,
}

struct Matcher {
    entry: usize,
    pattern: String,
    regex: Regex,
}

/// Compiled matchers for one glossary.
pub struct VocabularyDetector<'g> {
    glossary: &'g Glossary,
    matchers: Vec<Matcher>,
    config: VocabularyConfig,
}

impl<'g> VocabularyDetector<'g> {
    /// Compile a matcher for every term and keyword.
    ///
    /// Blank keywords are ignored and exact duplicates within an entry are
    /// compiled once. Spellings that differ only in case are kept so each can
    /// earn the exact-casing bonus.
    pub fn new(glossary: &'g Glossary, config: VocabularyConfig) -> Self {
        let mut matchers = Vec::new();

        for (idx, entry) in glossary.entries.iter().enumerate() {
            let mut seen: Vec<String> = Vec::new();
            for pattern in std::iter::once(&entry.term).chain(&entry.keywords) {
                let pattern = pattern.trim();
                if pattern.is_empty() || seen.iter().any(|s| s == pattern) {
                    continue;
                }
                seen.push(pattern.to_string());

                match RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(true)
                    .build()
                {
                    Ok(regex) => matchers.push(Matcher {
                        entry: idx,
                        pattern: pattern.to_string(),
                        regex,
                    }),
                    Err(e) => warn!(term = %entry.term, "skipping glossary keyword: {e}"),
                }
            }
        }

        debug!(
            entries = glossary.len(),
            matchers = matchers.len(),
            "compiled glossary"
        );
        Self {
            glossary,
            matchers,
            config,
        }
    }

    /// Matches at or above `min_confidence`, strongest first.
    pub fn detect(&self, text: &str, min_confidence: f64) -> Vec<VocabularyMatch> {
        // Best hit per (entry, offset).
        let mut best: HashMap<(usize, usize), VocabularyMatch> = HashMap::new();

        for matcher in &self.matchers {
            for found in matcher.regex.find_iter(text) {
                if !is_whole_word(text, found.start(), found.end()) {
                    continue;
                }
                let confidence = self.confidence(text, found.start(), found.end(), &matcher.pattern);
                if confidence < min_confidence {
                    continue;
                }

                let candidate = self.build_match(matcher.entry, text, found.start(), found.end(), confidence);
                best.entry((matcher.entry, found.start()))
                    .and_modify(|existing| {
                        if (candidate.confidence, candidate.matched_text.len())
                            > (existing.confidence, existing.matched_text.len())
                        {
                            *existing = candidate.clone();
                        }
                    })
                    .or_insert(candidate);
            }
        }

        let mut matches: Vec<VocabularyMatch> = best.into_values().collect();
        matches.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then(a.offset.cmp(&b.offset))
                .then_with(|| a.term.cmp(&b.term))
        });
        matches
    }

    fn confidence(&self, text: &str, start: usize, end: usize, pattern: &str) -> f64 {
        let mut score = self.config.base_confidence;
        if &text[start..end] == pattern {
            score += self.config.exact_case_bonus;
        }
        if has_code_context(text, start, end, self.config.context_window) {
            score += self.config.code_context_bonus;
        }
        score.min(1.0)
    }

    fn build_match(
        &self,
        entry: usize,
        text: &str,
        start: usize,
        end: usize,
        confidence: f64,
    ) -> VocabularyMatch {
        let glossary_entry = &self.glossary.entries[entry];
        let (line, column) = line_column(text, start);
        VocabularyMatch {
            term: glossary_entry.term.clone(),
            matched_text: text[start..end].to_string(),
            definition: glossary_entry.definition.clone(),
            category: glossary_entry.category.clone(),
            confidence,
            line,
            column,
            offset: start,
            context: context_window(text, start, end - start, CONTEXT_RADIUS)
                .replace(['\n', '\r'], " "),
        }
    }
}

/// Detect glossary terms in `text` with default scoring.
///
/// ```rust
/// use lore_core::{Glossary, GlossaryEntry, detect_vocabulary};
///
/// let glossary = Glossary::new(vec![GlossaryEntry {
///     term: "signal".into(),
///     definition: "A reactive value container".into(),
///     keywords: vec!["signals".into()],
///     category: Some("reactivity".into()),
///     related_topics: vec![],
/// }]);
///
/// let found = detect_vocabulary(&glossary, "Create a signal with signal(0).", 0.7);
/// assert_eq!(found.len(), 2);
/// assert!(found[0].confidence >= found[1].confidence);
/// ```
pub fn detect_vocabulary(glossary: &Glossary, text: &str, min_confidence: f64) -> Vec<VocabularyMatch> {
    VocabularyDetector::new(glossary, VocabularyConfig::default()).detect(text, min_confidence)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Neither neighbor of `start..end` continues a word.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn has_code_context(text: &str, start: usize, end: usize, window: usize) -> bool {
    let before = text[..start].chars().rev().take(window);
    let after = text[end..].chars().take(window);
    before.chain(after).any(|c| CODE_MARKERS.contains(&c))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn glossary() -> Glossary {
        Glossary::from_json(
            r#"[
                {"term": "signal", "definition": "Reactive value", "keywords": ["signals", "Signal"], "category": "reactivity"},
                {"term": "Dependency Injection", "definition": "Supplying collaborators", "keywords": ["DI"], "relatedTopics": ["services"]},
                {"term": "pipe", "definition": "Template transform"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_json_accepts_wrapped_form() {
        let g = Glossary::from_json(r#"{"entries": [{"term": "x", "definition": "y"}]}"#).unwrap();
        assert_eq!(g.len(), 1);
        assert!(g.entries[0].keywords.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Glossary::from_json("{\"nope\": 1}"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_whole_word_only() {
        let found = detect_vocabulary(&glossary(), "pipeline and pipes are not a pipe", 0.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].term, "pipe");
        assert_eq!(found[0].offset, 29);
    }

    #[test]
    fn test_confidence_components() {
        let g = glossary();

        // Plain lowercase mention: exact casing bonus only.
        let found = detect_vocabulary(&g, "a signal here", 0.0);
        assert!((found[0].confidence - 0.9).abs() < 1e-9);

        // Different casing, no code nearby: base only.
        let found = detect_vocabulary(&g, "the PIPE is long", 0.0);
        assert!((found[0].confidence - 0.8).abs() < 1e-9);

        // Exact casing and code context: capped at 1.0.
        let found = detect_vocabulary(&g, "call signal(0) now", 0.0);
        assert!((found[0].confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_confidence_filters() {
        let found = detect_vocabulary(&glossary(), "the PIPE is long", 0.85);
        assert!(found.is_empty());
    }

    #[test]
    fn test_same_offset_is_deduplicated() {
        // "Signal" matches both the term and the "Signal" keyword at one offset.
        let found = detect_vocabulary(&glossary(), "Signal basics", 0.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].matched_text, "Signal");
        assert!((found[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_positions_and_ordering() {
        let text = "Intro line\nUse DI for services.\nA pipe is handy. Then @Input() pipe";
        let found = detect_vocabulary(&glossary(), text, 0.7);

        let di = found.iter().find(|m| m.term == "Dependency Injection").unwrap();
        assert_eq!((di.line, di.column), (2, 5));
        assert_eq!(&text[di.offset..di.offset + 2], "DI");

        // The pipe near `@Input()` outranks the plain one.
        let pipes: Vec<_> = found.iter().filter(|m| m.term == "pipe").collect();
        assert_eq!(pipes.len(), 2);
        assert!(pipes[0].offset > pipes[1].offset);
        assert!(found.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_context_is_bounded_and_single_line() {
        let text = format!("{}\nsignal\n{}", "x".repeat(100), "y".repeat(100));
        let found = detect_vocabulary(&glossary(), &text, 0.0);
        assert!(found[0].context.len() <= 6 + 2 * CONTEXT_RADIUS);
        assert!(!found[0].context.contains('\n'));
    }

    #[test]
    fn test_lookup_by_keyword() {
        let g = glossary();
        assert_eq!(g.lookup("di").map(|e| e.term.as_str()), Some("Dependency Injection"));
        assert!(g.lookup("zone").is_none());
    }
}
