//! CSV writing operations.

use std::path::Path;

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::{common::write_atomic, table::TabularDataset, types::DistrictId};

/// Build a `year, district_id, <metric>` DataFrame from a district series.
fn series_frame(year: i32, metric: &str, series: &[(DistrictId, Option<f64>)]) -> Result<DataFrame> {
    let years = vec![year; series.len()];
    let (ids, values) = series.iter()
        .map(|(id, value)| (id.get(), *value))
        .unzip::<_, _, Vec<_>, Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("district_id".into(), ids).into(),
        Series::new(metric.into(), values).into(),
    ])?)
}

/// Write a DataFrame to CSV bytes.
pub(crate) fn write_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    CsvWriter::new(&mut out)
        .finish(&mut df.clone())
        .context("[io::csv::write] Failed to write CSV to bytes")?;
    Ok(out)
}

impl TabularDataset {
    /// Per-district values of one metric in one year as CSV bytes, ordered by district id.
    pub fn series_csv_bytes(&self, year: i32, metric: &str) -> Result<Vec<u8>> {
        let df = series_frame(year, metric, &self.district_series(year, metric))?;
        write_csv_bytes(&df)
    }

    /// Write the per-district series for `year` and `metric` to `path`.
    pub fn write_series_csv(&self, path: &Path, year: i32, metric: &str, force: bool) -> Result<()> {
        let bytes = self.series_csv_bytes(year, metric)?;
        write_atomic(path, &bytes, force)
            .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
    }
}
