use anyhow::{Context, Result};
use polars::{frame::DataFrame, prelude::{Column, DataType}};
use tracing::{debug, warn};

use crate::config::DatasetConfig;
use super::{
    dataset::{DistrictRecord, TabularDataset},
    number::{parse_localized, parse_year, year_from_number},
};

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).with_context(|| format!("[table::normalize] Missing column {name:?}"))
}

/// Read one column of a raw table as optional strings, casting if it was inferred as numeric.
fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = column(df, name)?
        .cast(&DataType::String)
        .with_context(|| format!("[table::normalize] Column {name:?} cannot be read as text"))?;

    Ok(column.str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Numbers of one column plus the count of non-blank cells that did not parse.
///
/// Numeric dtypes are read as they are. Text goes through the decimal-comma parser.
fn numeric_values(df: &DataFrame, name: &str) -> Result<(Vec<Option<f64>>, usize)> {
    let column = column(df, name)?;

    if column.dtype().is_primitive_numeric() {
        let column = column.cast(&DataType::Float64)
            .with_context(|| format!("[table::normalize] Column {name:?} cannot be read as numbers"))?;
        let values = column.f64()?
            .into_iter()
            .map(|v| v.filter(|v| v.is_finite()))
            .collect();
        return Ok((values, 0));
    }

    let mut unparsed = 0usize;
    let values = string_values(df, name)?
        .into_iter()
        .map(|cell| {
            let cell = cell.unwrap_or_default();
            let value = parse_localized(&cell);
            if value.is_none() && !cell.trim().is_empty() { unparsed += 1 }
            value
        })
        .collect();
    Ok((values, unparsed))
}

/// Years of one column; numeric dtypes skip the text parser.
fn year_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    if column(df, name)?.dtype().is_primitive_numeric() {
        let (values, _) = numeric_values(df, name)?;
        return Ok(values.into_iter().map(|v| v.and_then(year_from_number)).collect());
    }
    Ok(string_values(df, name)?
        .into_iter()
        .map(|cell| cell.as_deref().and_then(parse_year))
        .collect())
}

impl TabularDataset {
    /// Normalize a raw table: derive district ids from the composite code, parse years and
    /// coerce every configured metric column to numbers.
    ///
    /// Rows without a usable district code or year are dropped. Metric cells that do not
    /// parse become missing values.
    pub fn from_frame(df: &DataFrame, config: &DatasetConfig) -> Result<Self> {
        config.district_code.validate()?;

        let codes = string_values(df, &config.district_code_column)?;
        let years = year_values(df, &config.year_column)?;
        let (metric_columns, unparsed): (Vec<_>, Vec<_>) = config.metric_names()
            .map(|name| numeric_values(df, name))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        let non_numeric: usize = unparsed.iter().sum();

        let mut records = Vec::with_capacity(df.height());

        for row in 0..df.height() {
            let code = codes[row].as_deref().unwrap_or("");
            let Some(district_id) = config.district_code.extract(code) else {
                warn!(row, code, "row without a usable district code dropped");
                continue;
            };
            let Some(year) = years[row] else {
                warn!(row, district = %district_id, "row without a usable year dropped");
                continue;
            };

            let values = metric_columns.iter().map(|column| column[row]).collect();

            records.push(DistrictRecord::new(district_id, year, values));
        }

        if non_numeric > 0 {
            debug!(cells = non_numeric, "non-numeric metric cells mapped to missing values");
        }

        let metrics = config.metric_names().map(str::to_owned).collect();
        Ok(Self::new(metrics, records))
    }
}
