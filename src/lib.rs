#![doc = "Vienna district statistics on a map: join, enrich, label"]
mod boundary;
mod cache;
mod common;
mod config;
#[cfg(feature = "download")]
mod download;
mod io;
mod pipeline;
mod table;
mod types;

#[doc(inline)]
pub use types::{DistrictCodeRule, DistrictId};

#[doc(inline)]
pub use config::{BoundaryProperties, DatasetConfig, MetricSpec, Sources};

#[doc(inline)]
pub use table::{DistrictRecord, TabularDataset, YearSlice};

#[doc(inline)]
pub use io::table_columns;

#[doc(inline)]
pub use boundary::{BoundaryFeature, BoundarySet};

#[doc(inline)]
pub use pipeline::{
    build_labels, check_multipolygon, enrich, format_value, is_valid, join, representative_point, run,
    EnrichedFeature, GeometryIssue, JoinedFeature, LabelEntry, Match, PipelineOutput, Selection, ORIGIN,
};

#[doc(inline)]
pub use cache::{PipelineCache, Snapshot, SnapshotId};

#[cfg(feature = "download")]
#[doc(inline)]
pub use download::{fetch_sources, SourceFiles, BOUNDARY_FILE, TABLE_FILE};
