//! # lore-core
//!
//! Content processing and code-sample search for educational topic documents.
//!
//! A topic document is markdown with an optional YAML metadata block. This
//! crate turns one into navigable structure, and turns a corpus of code
//! samples into a ranked, searchable index.
//!
//! ## Architecture
//!
//! - **Document pipeline** (pure, synchronous): [`extract_metadata`] →
//!   [`extract_headings`] and [`extract_code_blocks`] over the body →
//!   [`build_toc`] and [`estimate_reading_time`]. [`process_document`]
//!   composes all of them.
//! - **Vocabulary**: [`detect_vocabulary`] finds glossary terms in prose.
//! - **Index**: [`build_index`] derives keywords, weight and complexity for
//!   every [`CodeSample`] and produces an immutable [`IndexGeneration`].
//! - **Search**: [`search::search`] ranks entries against a query with
//!   substring and fuzzy matching; pattern and related-entry lookups live in
//!   the same module.
//! - **Service**: [`IndexService`] owns the published generation and
//!   serializes rebuilds; [`Debouncer`] and [`ContentCache`] support
//!   interactive callers.
//!
//! ## Quick Start
//!
//! ```rust
//! use lore_core::process_document;
//!
//! let doc = process_document("---\ntitle: Signals\n---\n# Signals\n\n## Reading\n\nText.");
//!
//! assert_eq!(doc.metadata.unwrap().title.as_deref(), Some("Signals"));
//! assert_eq!(doc.toc[0].children[0].id, "reading");
//! ```
//!
//! ## Error Handling
//!
//! Processing never fails: malformed metadata or fences degrade to plain text
//! and are logged with `tracing`. Fallible operations (loading content,
//! configuration, rebuilding an index) return [`Result<T, Error>`]:
//!
//! ```rust
//! use lore_core::{ContentLoader, Error, FsContentLoader};
//!
//! let loader = FsContentLoader::new("/nonexistent");
//! match loader.fetch("intro") {
//!     Err(e) if e.is_user_facing() => println!("{e}"),
//!     Err(e) => eprintln!("unexpected: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

/// Document-id keyed raw text cache
pub mod cache;
/// Fenced code block extraction, cleaning and language detection
pub mod code_block;
/// Tunable constants and TOML configuration
pub mod config;
/// Quiet-window scheduling for interactive queries
pub mod debounce;
/// Error types and result aliases
pub mod error;
/// Metadata block extraction
pub mod frontmatter;
/// Heading extraction and anchor generation
pub mod heading;
/// Code sample index builder
pub mod index;
/// Content sources
pub mod loader;
/// Whole-document processing
pub mod processor;
/// Reading-time estimation
pub mod reading_time;
/// Relevance, pattern and similarity search
pub mod search;
/// Active index ownership and rebuilds
pub mod service;
/// Table-of-contents construction
pub mod toc;
/// Text helpers shared across modules
pub mod utils;
/// Glossary term detection
pub mod vocabulary;

mod fence;
mod types;

pub use cache::ContentCache;
pub use code_block::{CodeBlockExtractor, extract_code_blocks};
pub use config::{
    CodeBlockConfig, Config, IdStrategy, ReadingTimeConfig, SearchConfig, VocabularyConfig,
};
pub use debounce::Debouncer;
pub use error::{Error, Result};
pub use frontmatter::extract_metadata;
pub use heading::{annotate_anchors, extract_headings};
pub use index::{CodeSample, IndexEntry, IndexExport, IndexGeneration, IndexStats, SampleBatch, build_index};
pub use loader::{ContentLoader, FsContentLoader};
pub use processor::{process_document, process_document_with};
pub use reading_time::estimate_reading_time;
pub use search::{
    MatchType, SearchFilter, SearchOptions, SearchResultItem, group_by_category, group_by_language,
};
pub use service::{BuildState, IndexService};
pub use toc::build_toc;
pub use types::*;
pub use vocabulary::{Glossary, GlossaryEntry, VocabularyMatch, detect_vocabulary};
