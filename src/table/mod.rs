mod dataset;
mod normalize;
mod number;

pub use dataset::{DistrictRecord, TabularDataset, YearSlice};
