//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvEncoding, CsvReadOptions, CsvReader}};

use crate::{config::DatasetConfig, table::TabularDataset};

/// Field separator of the statistics export.
const SEPARATOR: u8 = b';';

/// Reader options for the statistics export: header after `header_row` preamble lines,
/// semicolon separated, every column kept as text so number coercion stays under our control.
fn table_read_options(config: &DatasetConfig) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(config.header_row)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po
            .with_separator(SEPARATOR)
            .with_encoding(CsvEncoding::LossyUtf8))
}

/// Reads the raw statistics table at `path` into a string-typed DataFrame.
pub(crate) fn read_table_csv(path: &Path, config: &DatasetConfig) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    table_read_options(config)
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads the raw statistics table from bytes.
pub(crate) fn read_table_csv_bytes(bytes: &[u8], config: &DatasetConfig) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(bytes))
        .with_options(table_read_options(config))
        .finish()
        .context("[io::csv::read] Failed to read CSV from bytes")
}

/// Column names of the raw statistics export at `path`, in file order.
pub fn table_columns(path: &Path, config: &DatasetConfig) -> Result<Vec<String>> {
    let df = read_table_csv(path, config)?;
    Ok(df.get_column_names().into_iter().map(|name| name.to_string()).collect())
}

impl TabularDataset {
    /// Read and normalize the statistics export at `path`.
    pub fn read_csv(path: &Path, config: &DatasetConfig) -> Result<Self> {
        let df = read_table_csv(path, config)?;
        Self::from_frame(&df, config)
            .with_context(|| format!("[io::csv::read] Failed to normalize {}", path.display()))
    }

    /// Read and normalize the statistics export from bytes.
    pub fn from_csv_bytes(bytes: &[u8], config: &DatasetConfig) -> Result<Self> {
        let df = read_table_csv_bytes(bytes, config)?;
        Self::from_frame(&df, config)
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::DatasetConfig, types::DistrictId};
    use super::*;

    const CSV: &str = "\
Kfz-Bestand nach Bezirken;;;;;;
NUTS;DISTRICT_CODE;SUB_DISTRICT_CODE;REF_YEAR;REF_DATE;PKW_VALUE;REMARK
AT130;90100;90100;2020;20201231;1.234,5;
AT130;90200;90200;2020;20201231;-;
AT130;90100;90100;2021;20211231;1.300;
";

    #[test]
    fn reads_preamble_semicolons_and_decimal_commas() {
        let ds = TabularDataset::from_csv_bytes(CSV.as_bytes(), &DatasetConfig::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.years(), vec![2020, 2021]);

        let rows = ds.for_year(2020);
        assert_eq!(rows.rows()[0].district_id, DistrictId(1));
        assert_eq!(rows.rows()[0].value(0), Some(1234.5));
        assert_eq!(rows.rows()[1].value(0), None);
        assert_eq!(ds.for_year(2021).rows()[0].value(0), Some(1300.0));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles.csv");
        std::fs::write(&path, CSV).unwrap();

        let ds = TabularDataset::read_csv(&path, &DatasetConfig::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(TabularDataset::read_csv(&dir.path().join("missing.csv"), &DatasetConfig::default()).is_err());

        let columns = table_columns(&path, &DatasetConfig::default()).unwrap();
        assert_eq!(columns, ["NUTS", "DISTRICT_CODE", "SUB_DISTRICT_CODE", "REF_YEAR", "REF_DATE", "PKW_VALUE", "REMARK"]);
    }
}
