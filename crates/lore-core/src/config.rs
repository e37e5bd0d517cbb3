//! Tunable constants for the processing and search pipeline.
//!
//! Every scoring constant has a default that reproduces the reference
//! behavior, so an empty or missing configuration file is always valid.
//! Configuration is stored as TOML; unknown sections are rejected and missing
//! keys fall back to their defaults.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [reading_time]
//! words_per_minute = 220
//!
//! [vocabulary]
//! min_confidence = 0.8
//!
//! [search]
//! max_results = 20
//! fuzzy_threshold = 0.75
//!
//! [code_blocks]
//! id_strategy = "sequential"
//! ```
//!
//! ```rust
//! use lore_core::{Config, IdStrategy};
//!
//! let config: Config = toml::from_str("[code_blocks]\nid_strategy = \"sequential\"\n")?;
//! assert_eq!(config.code_blocks.id_strategy, IdStrategy::Sequential);
//! assert_eq!(config.search.min_score, 0.1);
//! # Ok::<(), toml::de::Error>(())
//! ```

use crate::{Error, Result, SkillLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub reading_time: ReadingTimeConfig,
    pub vocabulary: VocabularyConfig,
    pub search: SearchConfig,
    pub code_blocks: CodeBlockConfig,
}

/// Reading-time model: a base words-per-minute rate plus per-feature bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingTimeConfig {
    pub words_per_minute: f64,
    /// Minutes added per fenced code block.
    pub code_block_minutes: f64,
    /// Minutes added per inline code span.
    pub inline_code_minutes: f64,
    /// Minutes added per image.
    pub image_minutes: f64,
    /// Minutes added per list item.
    pub list_item_minutes: f64,
    /// Minutes added per table row.
    pub table_row_minutes: f64,
    pub fundamentals_multiplier: f64,
    pub intermediate_multiplier: f64,
    pub advanced_multiplier: f64,
    pub expert_multiplier: f64,
}

impl Default for ReadingTimeConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200.0,
            code_block_minutes: 1.5,
            inline_code_minutes: 0.1,
            image_minutes: 0.5,
            list_item_minutes: 0.05,
            table_row_minutes: 0.3,
            fundamentals_multiplier: 0.8,
            intermediate_multiplier: 1.0,
            advanced_multiplier: 1.3,
            expert_multiplier: 1.5,
        }
    }
}

impl ReadingTimeConfig {
    /// Pace multiplier for a skill level; unknown level reads at 1.0.
    pub fn multiplier(&self, level: Option<SkillLevel>) -> f64 {
        match level {
            Some(SkillLevel::Fundamentals) => self.fundamentals_multiplier,
            Some(SkillLevel::Intermediate) => self.intermediate_multiplier,
            Some(SkillLevel::Advanced) => self.advanced_multiplier,
            Some(SkillLevel::Expert) => self.expert_multiplier,
            None => 1.0,
        }
    }
}

/// Glossary matching confidence model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub base_confidence: f64,
    /// Bonus when the matched text has the glossary's exact casing.
    pub exact_case_bonus: f64,
    /// Bonus when nearby characters look like code.
    pub code_context_bonus: f64,
    /// Characters inspected on each side of a match for code context.
    pub context_window: usize,
    pub min_confidence: f64,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            base_confidence: 0.8,
            exact_case_bonus: 0.1,
            code_context_bonus: 0.1,
            context_window: 10,
            min_confidence: 0.7,
        }
    }
}

/// Search ranking and interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_score: f64,
    pub max_results: usize,
    /// Similarity above which two words are a fuzzy match.
    pub fuzzy_threshold: f64,
    /// Similarity above which two entries are related.
    pub related_threshold: f64,
    /// Quiet window before a typed query is evaluated.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_score: 0.1,
            max_results: 50,
            fuzzy_threshold: 0.7,
            related_threshold: 0.3,
            debounce_ms: 300,
        }
    }
}

/// How code block ids are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `code-<seq>-<unix seconds>`. Two runs inside the same second produce
    /// the same ids.
    #[default]
    Timestamped,
    /// `code-<seq>`, stable across runs.
    Sequential,
}

/// Code block display defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlockConfig {
    pub id_strategy: IdStrategy,
    /// Blocks longer than this many lines start collapsed.
    pub collapse_after_lines: usize,
    /// Blocks longer than this many lines show line numbers unless a
    /// directive says otherwise.
    pub line_numbers_after_lines: usize,
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            collapse_after_lines: 20,
            line_numbers_after_lines: 10,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or
    /// contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Write configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;
        Ok(())
    }

    /// Platform config location (`~/.config/lore/config.toml` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no home directory can be determined.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "lore", "lore")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
