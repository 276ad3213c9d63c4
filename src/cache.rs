//! Memoization of pipeline runs, kept outside the pure pipeline stages.

use std::{fmt, fs, path::Path, sync::Arc};

use ahash::AHashMap;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{
    boundary::BoundarySet,
    config::DatasetConfig,
    pipeline::{self, PipelineOutput, Selection},
    table::TabularDataset,
};

/// Content hash identifying one pair of loaded source datasets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotId(Arc<str>);

impl SnapshotId {
    /// SHA-256 over both raw inputs, each prefixed with its length so the split is unambiguous.
    pub fn from_sources(table: &[u8], boundaries: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        for bytes in [table, boundaries] {
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Self(hex::encode(hasher.finalize()).into())
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only pair of datasets loaded from one version of the sources.
#[derive(Debug, Clone)]
pub struct Snapshot {
    id: SnapshotId,
    table: TabularDataset,
    boundaries: BoundarySet,
}

impl Snapshot {
    /// Parse both raw inputs and tag them with their content hash.
    pub fn load(table_csv: &[u8], boundary_geojson: &[u8], config: &DatasetConfig) -> Result<Self> {
        Ok(Self {
            id: SnapshotId::from_sources(table_csv, boundary_geojson),
            table: TabularDataset::from_csv_bytes(table_csv, config)
                .context("[cache] Failed to load statistics table")?,
            boundaries: BoundarySet::from_geojson_bytes(boundary_geojson, &config.boundary)
                .context("[cache] Failed to load district boundaries")?,
        })
    }

    pub fn from_files(table_path: &Path, boundary_path: &Path, config: &DatasetConfig) -> Result<Self> {
        let table_csv = fs::read(table_path)
            .with_context(|| format!("[cache] Failed to read {}", table_path.display()))?;
        let boundary_geojson = fs::read(boundary_path)
            .with_context(|| format!("[cache] Failed to read {}", boundary_path.display()))?;
        Self::load(&table_csv, &boundary_geojson, config)
    }

    #[inline] pub fn id(&self) -> &SnapshotId { &self.id }

    #[inline] pub fn table(&self) -> &TabularDataset { &self.table }

    #[inline] pub fn boundaries(&self) -> &BoundarySet { &self.boundaries }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    snapshot: SnapshotId,
    selection: Selection,
}

/// Pipeline results keyed by `(snapshot, metric, year)`.
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: AHashMap<CacheKey, Arc<PipelineOutput>>,
}

impl PipelineCache {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Return the cached output for this selection, running the pipeline on a miss.
    /// Failed runs are not cached.
    pub fn get_or_run(&mut self, snapshot: &Snapshot, selection: &Selection) -> Result<Arc<PipelineOutput>> {
        let key = CacheKey { snapshot: snapshot.id.clone(), selection: selection.clone() };
        if let Some(output) = self.entries.get(&key) {
            debug!(snapshot = %snapshot.id, metric = selection.metric(), year = selection.year(), "pipeline cache hit");
            return Ok(Arc::clone(output));
        }

        let output = Arc::new(pipeline::run(&snapshot.table, &snapshot.boundaries, selection)?);
        self.entries.insert(key, Arc::clone(&output));
        Ok(output)
    }

    /// Drop every entry computed from `snapshot`. Returns how many were removed.
    pub fn invalidate(&mut self, snapshot: &SnapshotId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| &key.snapshot != snapshot);
        before - self.entries.len()
    }

    pub fn clear(&mut self) { self.entries.clear() }
}
