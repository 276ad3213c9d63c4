//! CSV format reading and writing operations.

mod read;
mod write;

pub use read::table_columns;
