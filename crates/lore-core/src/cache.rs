//! Raw document cache keyed by document id.

use crate::Result;
use crate::loader::ContentLoader;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Caller-owned map from document id to raw text.
///
/// Entries live until explicitly invalidated; there is no eviction.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    documents: HashMap<String, String>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    /// Store `raw` for `id`, returning the text it replaced.
    pub fn insert(&mut self, id: impl Into<String>, raw: impl Into<String>) -> Option<String> {
        self.documents.insert(id.into(), raw.into())
    }

    /// Cached text for `id`, fetching and storing it on a miss.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; nothing is cached on failure.
    pub fn get_or_load<L>(&mut self, id: &str, loader: &L) -> Result<&str>
    where
        L: ContentLoader + ?Sized,
    {
        match self.documents.entry(id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(entry) => {
                let raw = loader.fetch(id)?;
                debug!(id, "content cache miss");
                Ok(entry.insert(raw).as_str())
            },
        }
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&mut self, id: &str) -> bool {
        self.documents.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::Cell;

    struct CountingLoader {
        calls: Cell<usize>,
    }

    impl ContentLoader for CountingLoader {
        fn fetch(&self, id: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            if id == "missing" {
                return Err(Error::NotFound(id.to_string()));
            }
            Ok(format!("# {id}"))
        }
    }

    #[test]
    fn test_loads_once_until_invalidated() {
        let loader = CountingLoader { calls: Cell::new(0) };
        let mut cache = ContentCache::new();

        assert_eq!(cache.get_or_load("intro", &loader).unwrap(), "# intro");
        assert_eq!(cache.get_or_load("intro", &loader).unwrap(), "# intro");
        assert_eq!(loader.calls.get(), 1);

        assert!(cache.invalidate("intro"));
        assert!(!cache.invalidate("intro"));
        cache.get_or_load("intro", &loader).unwrap();
        assert_eq!(loader.calls.get(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let loader = CountingLoader { calls: Cell::new(0) };
        let mut cache = ContentCache::new();

        assert!(matches!(cache.get_or_load("missing", &loader), Err(Error::NotFound(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_and_clear() {
        let mut cache = ContentCache::new();
        assert_eq!(cache.insert("a", "one"), None);
        assert_eq!(cache.insert("a", "two"), Some("one".to_string()));
        cache.insert("b", "three");
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.get("a").is_none());
    }
}
