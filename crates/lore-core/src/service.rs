//! Owner of the active index generation and the content cache.
//!
//! Readers take a cheap `Arc` snapshot with [`IndexService::current`] and
//! search it without holding any lock. A rebuild runs off the async runtime and
//! publishes its result with a single pointer swap, so a reader sees either the
//! old generation or the new one, never a mix.
//!
//! ```text
//!        rebuild()            published
//! Idle ─────────────▶ Building ─────────▶ Ready
//!   ▲                    │                  │
//!   └── failed (none) ───┘                  │ rebuild()
//!                        ◀──────────────────┘
//! ```

use crate::cache::ContentCache;
use crate::index::{SampleBatch, build_batch_at};
use crate::loader::ContentLoader;
use crate::search::{SearchFilter, SearchOptions, SearchResultItem, search};
use crate::{CodeSample, Error, IndexGeneration, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Lifecycle of the service's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildState {
    /// Nothing published yet.
    Idle,
    Building,
    /// At least one generation is published.
    Ready,
}

/// Holds the published [`IndexGeneration`], serializes rebuilds, and caches
/// raw documents by id.
#[derive(Debug)]
pub struct IndexService {
    active: RwLock<Arc<IndexGeneration>>,
    state: Mutex<BuildState>,
    documents: Mutex<ContentCache>,
}

impl Default for IndexService {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexService {
    /// A service with an empty generation 0 and no build history.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(Arc::new(IndexGeneration::empty())),
            state: Mutex::new(BuildState::Idle),
            documents: Mutex::new(ContentCache::new()),
        }
    }

    /// A service that starts out serving `generation`, e.g. one read back
    /// from an export.
    pub fn with_generation(generation: IndexGeneration) -> Self {
        Self {
            active: RwLock::new(Arc::new(generation)),
            state: Mutex::new(BuildState::Ready),
            documents: Mutex::new(ContentCache::new()),
        }
    }

    pub fn state(&self) -> BuildState {
        *lock(&self.state)
    }

    /// Snapshot of the published generation.
    pub async fn current(&self) -> Arc<IndexGeneration> {
        Arc::clone(&*self.active.read().await)
    }

    /// Build a new generation from `samples` and publish it.
    ///
    /// Malformed samples are skipped, not fatal. The new generation number is
    /// one more than the currently published one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuildInProgress`] if another rebuild is running, or
    /// [`Error::Other`] if the build task panicked. In both cases the
    /// published generation is unchanged.
    pub async fn rebuild(&self, samples: Vec<CodeSample>) -> Result<Arc<IndexGeneration>> {
        self.rebuild_batch(SampleBatch::from(samples)).await
    }

    /// Like [`Self::rebuild`], counting the batch's rejected elements as
    /// skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::rebuild`].
    pub async fn rebuild_batch(&self, batch: SampleBatch) -> Result<Arc<IndexGeneration>> {
        let guard = self.begin_build()?;
        let next = self.active.read().await.generation + 1;

        let built = tokio::task::spawn_blocking(move || build_batch_at(&batch, Utc::now(), next))
            .await
            .map_err(|e| Error::Other(format!("index build task failed: {e}")))?;
        let built = Arc::new(built);

        *self.active.write().await = Arc::clone(&built);
        guard.complete();

        info!(
            generation = built.generation,
            entries = built.len(),
            skipped = built.stats.skipped,
            "published index generation"
        );
        Ok(built)
    }

    /// Search the current generation.
    pub async fn search(&self, query: &str, filter: &SearchFilter, options: &SearchOptions) -> Vec<SearchResultItem> {
        let index = self.current().await;
        search(&index, query, filter, options)
    }

    /// Raw text for document `id`, served from the cache after the first
    /// fetch.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; nothing is cached on failure.
    pub fn document<L>(&self, id: &str, loader: &L) -> Result<String>
    where
        L: ContentLoader + ?Sized,
    {
        let mut cache = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get_or_load(id, loader).map(str::to_owned)
    }

    /// Forget the cached text for `id` so the next read fetches it again.
    pub fn invalidate(&self, id: &str) -> bool {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate(id)
    }

    /// Forget every cached document.
    pub fn clear_documents(&self) {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn begin_build(&self) -> Result<BuildGuard<'_>> {
        let mut state = lock(&self.state);
        let restore = match *state {
            BuildState::Building => return Err(Error::BuildInProgress),
            other => other,
        };
        *state = BuildState::Building;
        Ok(BuildGuard {
            state: &self.state,
            on_drop: restore,
        })
    }
}

fn lock(state: &Mutex<BuildState>) -> MutexGuard<'_, BuildState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Leaves `Building` when dropped: `Ready` after [`Self::complete`], otherwise
/// back to the state the build started from.
struct BuildGuard<'a> {
    state: &'a Mutex<BuildState>,
    on_drop: BuildState,
}

impl BuildGuard<'_> {
    fn complete(mut self) {
        self.on_drop = BuildState::Ready;
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        if self.on_drop != BuildState::Ready {
            warn!(restored = ?self.on_drop, "index build did not complete");
        }
        *lock(self.state) = self.on_drop;
    }
}
