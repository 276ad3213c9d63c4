use std::{collections::HashSet, fs, path::Path};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::DistrictCodeRule;

/// A metric column the user may select, with the title shown in the metric picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub column: String,
    pub title: String,
}

impl MetricSpec {
    pub fn new(column: impl Into<String>, title: impl Into<String>) -> Self {
        Self { column: column.into(), title: title.into() }
    }
}

/// Names of the boundary feature properties holding the district number and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryProperties {
    pub id_property: String,
    pub name_property: String,
}

impl Default for BoundaryProperties {
    fn default() -> Self {
        Self {
            id_property: "BEZNR".into(),
            name_property: "NAMEK".into(),
        }
    }
}

/// Remote locations of the two source datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub table_url: String,
    pub boundary_url: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            table_url: "https://www.wien.gv.at/gogv/l9ogdviebezbiztecveh2002f".into(),
            boundary_url: "https://data.wien.gv.at/daten/geo?service=WFS&request=GetFeature&version=1.1.0\
                &typeName=ogdwien:BEZIRKSGRENZEOGD&srsName=EPSG:4326&outputFormat=json".into(),
        }
    }
}

/// Dataset-specific constants for reading and joining the two inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Lines to skip before the header row.
    pub header_row: usize,
    pub district_code_column: String,
    pub year_column: String,
    pub district_code: DistrictCodeRule,
    /// Allow-list of selectable metric columns, in picker order.
    pub metrics: Vec<MetricSpec>,
    pub boundary: BoundaryProperties,
    pub sources: Sources,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            header_row: 1,
            district_code_column: "DISTRICT_CODE".into(),
            year_column: "REF_YEAR".into(),
            district_code: DistrictCodeRule::VIENNA,
            metrics: vec![MetricSpec::new("PKW_VALUE", "Registered passenger cars")],
            boundary: BoundaryProperties::default(),
            sources: Sources::default(),
        }
    }
}

impl DatasetConfig {
    /// Load a config from a JSON file. Missing fields fall back to the Vienna defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        Self::from_json_bytes(&bytes)
            .with_context(|| format!("[config] Invalid config file: {}", path.display()))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(bytes).context("[config] Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.district_code.validate()?;
        ensure!(!self.metrics.is_empty(), "[config] At least one metric column must be configured");

        let mut seen = HashSet::new();
        for metric in &self.metrics {
            ensure!(!metric.column.is_empty(), "[config] Metric column names must not be empty");
            ensure!(seen.insert(metric.column.as_str()), "[config] Metric {:?} is listed twice", metric.column);
            ensure!(
                metric.column != self.district_code_column && metric.column != self.year_column,
                "[config] Metric {:?} collides with the district code or year column", metric.column
            );
        }
        Ok(())
    }

    #[inline]
    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.column.as_str())
    }

    #[inline]
    pub fn has_metric(&self, column: &str) -> bool {
        self.metrics.iter().any(|m| m.column == column)
    }

    /// Human-readable title for a metric column.
    pub fn metric_title(&self, column: &str) -> Option<&str> {
        self.metrics.iter()
            .find(|m| m.column == column)
            .map(|m| m.title.as_str())
    }
}
