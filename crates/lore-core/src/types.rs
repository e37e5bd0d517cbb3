use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keys that belong to the site build rather than the lesson and are never
/// exposed through [`Metadata::extra`].
const INTERNAL_KEYS: &[&str] = &[
    "layout",
    "permalink",
    "draft",
    "build",
    "eleventyNavigation",
    "eleventyExcludeFromCollections",
];

/// Learner skill level a topic is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Fundamentals,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Parse a skill level case-insensitively; unknown strings yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fundamentals" | "fundamental" | "beginner" => Some(Self::Fundamentals),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    /// Inclusive sample-difficulty band (0..=5) that corresponds to this level.
    pub const fn difficulty_band(self) -> (u8, u8) {
        match self {
            Self::Fundamentals => (0, 1),
            Self::Intermediate => (2, 3),
            Self::Advanced => (4, 4),
            Self::Expert => (5, 5),
        }
    }
}

/// Educational metadata read from a document's structured header.
///
/// Known fields are typed; anything else lands in `extra` after internal
/// build keys have been filtered out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub category: Option<String>,
    pub skill_level: Option<SkillLevel>,
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_topics: Vec<String>,
    pub last_updated: Option<String>,
    /// Passthrough fields not recognized above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metadata {
    /// Build metadata from a parsed key/value map.
    ///
    /// Accepts both `snake_case` and `camelCase` spellings of the known keys.
    /// List fields take either a sequence or a comma-separated string.
    pub fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        let mut meta = Self::default();

        for (key, value) in fields {
            match key.as_str() {
                "title" => meta.title = scalar_string(&value),
                "category" => meta.category = scalar_string(&value),
                "skill_level" | "skillLevel" | "level" => {
                    meta.skill_level = scalar_string(&value).as_deref().and_then(SkillLevel::parse);
                },
                "difficulty" => meta.difficulty = scalar_string(&value),
                "tags" => meta.tags = string_list(&value),
                "prerequisites" => meta.prerequisites = string_list(&value),
                "related_topics" | "relatedTopics" | "related" => {
                    meta.related_topics = string_list(&value);
                },
                "last_updated" | "lastUpdated" | "updated" => {
                    meta.last_updated = scalar_string(&value);
                },
                _ if is_internal_key(&key) => {},
                _ => {
                    meta.extra.insert(key, value);
                },
            }
        }

        meta
    }
}

fn is_internal_key(key: &str) -> bool {
    key.starts_with('_') || INTERNAL_KEYS.contains(&key)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        },
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

/// A section header found in a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor id, unique within the document.
    pub id: String,
    pub text: String,
    /// 1..=6
    pub level: u8,
    /// Zero-based line number within the body.
    pub line: usize,
}

/// A node of the table-of-contents forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSection {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub children: Vec<TocSection>,
    /// Zero-based line number of the heading within the body.
    pub start_position: usize,
}

/// A fenced code sample extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub id: String,
    /// Resolved language (declared tag when recognized, else detected).
    pub language: String,
    /// Set when the language came from content heuristics.
    pub detected_language: Option<String>,
    pub code: String,
    pub line_count: usize,
    pub title: Option<String>,
    pub file_name: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub show_line_numbers: bool,
    pub is_collapsible: bool,
    pub highlight_lines: Option<Vec<usize>>,
}

/// Split view of a raw document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub body: String,
    pub metadata: Option<Metadata>,
}

/// Everything derived from one processing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedDocument {
    pub body: String,
    pub headings: Vec<Heading>,
    pub code_blocks: Vec<CodeBlock>,
    pub toc: Vec<TocSection>,
    pub reading_time_minutes: u32,
    pub metadata: Option<Metadata>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_known_fields_are_typed() {
        let meta = Metadata::from_fields(fields(json!({
            "title": "Signals",
            "category": "reactivity",
            "skillLevel": "Advanced",
            "difficulty": 3,
            "tags": ["signals", "state"],
            "prerequisites": "components, templates",
            "lastUpdated": "2024-05-01"
        })));

        assert_eq!(meta.title.as_deref(), Some("Signals"));
        assert_eq!(meta.category.as_deref(), Some("reactivity"));
        assert_eq!(meta.skill_level, Some(SkillLevel::Advanced));
        assert_eq!(meta.difficulty.as_deref(), Some("3"));
        assert_eq!(meta.tags, vec!["signals", "state"]);
        assert_eq!(meta.prerequisites, vec!["components", "templates"]);
        assert_eq!(meta.last_updated.as_deref(), Some("2024-05-01"));
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_internal_fields_are_filtered() {
        let meta = Metadata::from_fields(fields(json!({
            "layout": "topic.njk",
            "_draftNotes": "wip",
            "permalink": false,
            "author": "docs team"
        })));

        assert_eq!(meta.extra.len(), 1);
        assert_eq!(meta.extra.get("author"), Some(&json!("docs team")));
    }

    #[test]
    fn test_unknown_skill_level_is_none() {
        let meta = Metadata::from_fields(fields(json!({ "skill_level": "wizard" })));
        assert_eq!(meta.skill_level, None);
    }

    #[test]
    fn test_skill_level_bands_cover_all_difficulties() {
        let levels = [
            SkillLevel::Fundamentals,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
            SkillLevel::Expert,
        ];
        for difficulty in 0u8..=5 {
            let covered = levels.iter().any(|level| {
                let (lo, hi) = level.difficulty_band();
                (lo..=hi).contains(&difficulty)
            });
            assert!(covered, "difficulty {difficulty} has no skill level");
        }
    }
}
