//! JSON export of point labels.

use std::path::Path;

use anyhow::{Context, Result};

use crate::{common::write_atomic, pipeline::PipelineOutput};

impl PipelineOutput {
    /// Labels as a JSON array of `{ "position": [x, y], "text": ... }`.
    pub fn labels_to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.labels).context("[io::labels] Failed to serialize labels")
    }

    pub fn write_labels(&self, path: &Path, force: bool) -> Result<()> {
        write_atomic(path, &self.labels_to_json()?, force)
            .with_context(|| format!("[io::labels] Failed to write labels to {:?}", path))
    }
}
