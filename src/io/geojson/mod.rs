//! GeoJSON reading and writing operations.

mod read;
mod write;
