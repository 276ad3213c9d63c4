use std::sync::Arc;

use geo::MultiPolygon;
use serde_json::{Map, Value};

use crate::types::DistrictId;

/// A district outline with its identifying properties.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    district_id: Option<DistrictId>, // Some boundary layers carry features without a district number.
    name: Arc<str>,
    geometry: MultiPolygon<f64>, // (lon, lat)
    properties: Map<String, Value>, // Remaining source properties, passed through to the output.
}

impl BoundaryFeature {
    pub fn new(district_id: Option<DistrictId>, name: impl Into<Arc<str>>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            district_id,
            name: name.into(),
            geometry: geometry.into(),
            properties: Map::new(),
        }
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    #[inline] pub fn district_id(&self) -> Option<DistrictId> { self.district_id }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn geometry(&self) -> &MultiPolygon<f64> { &self.geometry }

    #[inline] pub fn properties(&self) -> &Map<String, Value> { &self.properties }
}

/// Immutable collection of district outlines in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    features: Vec<Arc<BoundaryFeature>>,
}

impl BoundarySet {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features: features.into_iter().map(Arc::new).collect() }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Arc<BoundaryFeature>] { &self.features }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Arc<BoundaryFeature>> {
        self.features.iter()
    }

    /// Number of features carrying a district id.
    pub fn keyed_len(&self) -> usize {
        self.features.iter().filter(|f| f.district_id.is_some()).count()
    }
}

impl FromIterator<BoundaryFeature> for BoundarySet {
    fn from_iter<I: IntoIterator<Item = BoundaryFeature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
