//! Structured-header (front matter) extraction.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Signals
//! category: reactivity
//! ---
//! # Signals
//! ```
//!
//! Extraction never fails. Text without a complete block is returned untouched,
//! and a block that does not parse is stripped from the body but yields no
//! metadata.

use crate::{Error, Extracted, Metadata, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const DELIMITER: &str = "---";

/// Byte layout of a delimited header block.
struct HeaderSpan<'a> {
    yaml: &'a str,
    rest: &'a str,
}

/// Split `raw` into metadata and body.
///
/// # Examples
///
/// ```rust
/// use lore_core::extract_metadata;
///
/// let doc = extract_metadata("---\ntitle: X\ncategory: Y\n---\n# Content\n");
/// assert_eq!(doc.metadata.unwrap().title.as_deref(), Some("X"));
/// assert_eq!(doc.body, "# Content");
///
/// let plain = extract_metadata("# No header");
/// assert!(plain.metadata.is_none());
/// assert_eq!(plain.body, "# No header");
/// ```
pub fn extract_metadata(raw: &str) -> Extracted {
    let Some(span) = locate_header(raw) else {
        return Extracted {
            body: raw.to_string(),
            metadata: None,
        };
    };

    let metadata = match parse_header(span.yaml) {
        Ok(meta) => meta,
        Err(err) => {
            warn!(category = err.category(), "ignoring malformed front matter: {err}");
            None
        },
    };

    Extracted {
        body: span.rest.trim().to_string(),
        metadata,
    }
}

/// Byte length of the header block including both delimiter lines, or 0 when
/// the text has no complete block.
pub fn header_len(raw: &str) -> usize {
    locate_header(raw).map_or(0, |span| raw.len() - span.rest.len())
}

fn locate_header(raw: &str) -> Option<HeaderSpan<'_>> {
    let mut lines = raw.split_inclusive('\n');
    let first = lines.next()?;
    if !is_delimiter(first) {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if is_delimiter(line) {
            debug!(bytes = offset - yaml_start, "found front matter block");
            return Some(HeaderSpan {
                yaml: &raw[yaml_start..offset],
                rest: &raw[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    None
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).trim_end() == DELIMITER
}

/// Parse the YAML between the delimiters.
///
/// Returns `Ok(None)` for an empty block and [`Error::Parse`] when the content
/// is not a key/value mapping.
pub fn parse_header(yaml: &str) -> Result<Option<Metadata>> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(yaml).map_err(|e| Error::Parse(format!("invalid YAML: {e}")))?;

    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::Mapping(_) => {
            let fields: BTreeMap<String, Value> = serde_json::to_value(&value)
                .and_then(serde_json::from_value)
                .map_err(|e| Error::Parse(format!("unsupported front matter value: {e}")))?;
            Ok(Some(Metadata::from_fields(fields)))
        },
        _ => Err(Error::Parse("front matter is not a key/value mapping".into())),
    }
}
