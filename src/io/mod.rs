//! Format-specific reading and writing.
//!
//! - `csv` - the semicolon statistics export and per-district series output
//! - `geojson` - district boundaries in, enriched choropleth layer out
//! - `labels` - point labels as JSON
//!
//! Readers and writers are exposed as methods on the types they produce or consume.

mod csv;
mod geojson;
mod labels;

pub use self::csv::table_columns;
