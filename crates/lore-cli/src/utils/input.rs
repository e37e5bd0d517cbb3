//! Reading documents, corpora and configuration from disk.

use anyhow::{Context, Result, bail};
use lore_core::{
    Config, ContentLoader, FsContentLoader, Glossary, IndexExport, IndexGeneration, IndexService, SampleBatch,
};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::cli::{DocumentArgs, IndexSource};

/// Load configuration from `explicit`, else from the platform location, else
/// defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match Config::default_path() {
        Ok(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
        Err(err) => {
            warn!("{err}; using default configuration");
            Ok(Config::default())
        },
    }
}

/// Raw text of the requested document.
pub fn read_document(args: &DocumentArgs) -> Result<String> {
    match &args.root {
        Some(root) => {
            let loader = FsContentLoader::new(root);
            loader
                .fetch(&args.document)
                .with_context(|| format!("Failed to load document '{}'", args.document))
        },
        None => fs::read_to_string(&args.document)
            .with_context(|| format!("Failed to read document {}", args.document)),
    }
}

/// Decode a sample file; elements that do not decode are skipped, not fatal.
pub fn read_samples(path: &Path) -> Result<SampleBatch> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read samples {}", path.display()))?;
    let batch = SampleBatch::from_json(&json).with_context(|| format!("Invalid sample file {}", path.display()))?;
    debug!(
        path = %path.display(),
        samples = batch.samples.len(),
        rejected = batch.rejected,
        "read samples"
    );
    Ok(batch)
}

pub fn read_glossary(path: &Path) -> Result<Glossary> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read glossary {}", path.display()))?;
    Glossary::from_json(&json).with_context(|| format!("Invalid glossary {}", path.display()))
}

/// Build or read back the index named by `source`.
pub async fn load_index(source: &IndexSource) -> Result<IndexGeneration> {
    if let Some(path) = &source.index {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read index {}", path.display()))?;
        let export = IndexExport::from_json(&json).with_context(|| format!("Invalid index export {}", path.display()))?;
        return Ok(export.into_generation(1));
    }

    let Some(path) = &source.samples else {
        bail!("No code samples given; pass --samples FILE or --index FILE");
    };
    let service = IndexService::new();
    let index = service.rebuild_batch(read_samples(path)?).await?;
    Ok(IndexGeneration::clone(&index))
}
