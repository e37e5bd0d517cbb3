//! Error types and handling for lore-core operations.
//!
//! The processing pipeline is deliberately forgiving: malformed metadata and
//! malformed fences are recovered where they occur and never surface as an
//! [`Error`]. What remains are the failures a caller can act on.
//!
//! ## Error Categories
//!
//! - **Parse Errors**: metadata blocks or fenced spans that could not be read.
//!   These are logged and degraded locally; the variant exists so helpers can
//!   report *why* they fell back.
//! - **Not Found**: the content loader could not locate a document. This is the
//!   only kind meant to reach an end user.
//! - **Build Entry Errors**: a single code sample could not be indexed. The build
//!   skips the sample and carries on.
//! - **Build In Progress**: a rebuild was requested while one was running.
//! - **Configuration / Serialization / I/O**: ambient failures at the edges.
//!
//! ```rust
//! use lore_core::Error;
//!
//! let err = Error::NotFound("topics/signals".to_string());
//! assert_eq!(err.category(), "not_found");
//! assert!(err.is_user_facing());
//! ```

use thiserror::Error;

/// The main error type for lore-core operations.
///
/// All fallible public functions return `Result<T, Error>`. The processing
/// entry points (`process_document`, `extract_metadata`) are infallible by
/// construction and never produce one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Raised by the filesystem content loader and by configuration loading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be parsed.
    ///
    /// Covers malformed metadata blocks and malformed fenced spans. Extraction
    /// functions recover from these locally; the variant is returned only by
    /// the lower-level parsing helpers.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested content was not found.
    ///
    /// Returned by [`crate::ContentLoader`] implementations. Callers typically
    /// render this inline as an explanatory message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A single code sample could not be indexed.
    ///
    /// The index build catches this per sample, logs it, and excludes the
    /// sample from the published generation.
    #[error("Failed to index sample '{id}': {reason}")]
    BuildEntry {
        /// Identifier of the offending sample (may be empty).
        id: String,
        /// Why the sample was rejected.
        reason: String,
    },

    /// An index rebuild was requested while another was still running.
    #[error("Index build already in progress")]
    BuildInProgress,

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    ///
    /// Used for the JSON index export, glossary files and sample corpora.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the operation might succeed when retried.
    ///
    /// Only a concurrent rebuild and interrupted I/O are transient. Everything
    /// else describes the input and will fail the same way again.
    ///
    /// ```rust
    /// use lore_core::Error;
    ///
    /// assert!(Error::BuildInProgress.is_recoverable());
    /// assert!(!Error::Parse("bad yaml".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::BuildInProgress => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Whether the error is meant to be shown to a learner rather than logged.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Get the error category as a stable string identifier.
    ///
    /// Useful as a structured logging field:
    ///
    /// ```rust
    /// use lore_core::Error;
    ///
    /// let err = Error::BuildEntry { id: "a".into(), reason: "empty code".into() };
    /// tracing::warn!(category = err.category(), "{err}");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::NotFound(_) => "not_found",
            Self::BuildEntry { .. } => "build_entry",
            Self::BuildInProgress => "build_in_progress",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
