//! Join statistics onto district boundaries and derive map overlays.
//!
//! Each stage is a pure transform of its input snapshot: [`join`] → [`enrich`] → [`build_labels`].

mod centroid;
mod join;
mod label;
mod validity;

pub use centroid::{enrich, representative_point, EnrichedFeature, ORIGIN};
pub use join::{join, JoinedFeature, Match};
pub use label::{build_labels, format_value, LabelEntry};
pub use validity::{check_multipolygon, is_valid, GeometryIssue};

use anyhow::{bail, Result};
use tracing::{debug, warn};

use crate::{boundary::BoundarySet, config::DatasetConfig, table::TabularDataset};

/// The metric and reference year picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    metric: String,
    year: i32,
}

impl Selection {
    /// Build a selection, rejecting metrics outside the configured allow-list.
    pub fn new(config: &DatasetConfig, metric: &str, year: i32) -> Result<Self> {
        if !config.has_metric(metric) {
            bail!(
                "[pipeline] Unknown metric {metric:?}, expected one of: {}",
                config.metric_names().collect::<Vec<_>>().join(", ")
            );
        }
        Ok(Self { metric: metric.to_owned(), year })
    }

    #[inline] pub fn metric(&self) -> &str { &self.metric }

    #[inline] pub fn year(&self) -> i32 { self.year }
}

/// Everything the map renderer needs for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub selection: Selection,
    pub features: Vec<EnrichedFeature>,
    pub labels: Vec<LabelEntry>,
}

/// Run the full pipeline for one selection.
///
/// A year without rows is not an error: every keyed feature is painted as `0.0`.
pub fn run(table: &TabularDataset, boundaries: &BoundarySet, selection: &Selection) -> Result<PipelineOutput> {
    if table.metric_index(selection.metric()).is_none() {
        bail!(
            "[pipeline] Table has no metric column {:?}, available: {}",
            selection.metric(),
            table.metrics().join(", ")
        );
    }

    let rows = table.for_year(selection.year());
    if rows.is_empty() {
        warn!(year = selection.year(), "no rows for the selected year, map shows zeros");
    }

    let joined = join(boundaries, &rows, selection.metric());
    let features = enrich(joined);
    let labels = build_labels(&features);

    debug!(
        metric = selection.metric(),
        year = selection.year(),
        features = features.len(),
        labels = labels.len(),
        "pipeline finished"
    );

    Ok(PipelineOutput { selection: selection.clone(), features, labels })
}
