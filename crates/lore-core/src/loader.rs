//! Content sources for raw topic documents.

use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Supplies raw document text by id.
pub trait ContentLoader {
    /// Fetch the raw text of document `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no such document exists.
    fn fetch(&self, id: &str) -> Result<String>;
}

/// Reads `<root>/<id>.md` from disk. Ids may contain `/` to address nested
/// topics but may not leave the root.
#[derive(Debug, Clone)]
pub struct FsContentLoader {
    root: PathBuf,
}

impl FsContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a document id maps to, or `None` for ids that would escape the
    /// root.
    pub fn path_for(&self, id: &str) -> Option<PathBuf> {
        let relative = Path::new(id);
        let contained = !id.trim().is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        contained.then(|| self.root.join(format!("{id}.md")))
    }
}

impl ContentLoader for FsContentLoader {
    fn fetch(&self, id: &str) -> Result<String> {
        let path = self
            .path_for(id)
            .ok_or_else(|| Error::NotFound(format!("invalid document id '{id}'")))?;

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(id, bytes = text.len(), "loaded document");
                Ok(text)
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(format!("document '{id}' at {}", path.display())))
            },
            Err(err) => Err(Error::Io(err)),
        }
    }
}
