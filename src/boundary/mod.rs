mod feature;

pub use feature::{BoundaryFeature, BoundarySet};
