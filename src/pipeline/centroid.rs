use std::sync::Arc;

use geo::{Centroid, MultiPolygon, Point};
use tracing::warn;

use crate::boundary::BoundaryFeature;
use super::{join::{JoinedFeature, Match}, validity::check_multipolygon};

/// Label anchor for features whose geometry failed validation.
pub const ORIGIN: Point<f64> = Point(geo::Coord { x: 0.0, y: 0.0 });

/// A joined boundary with its label anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFeature {
    pub feature: Arc<BoundaryFeature>,
    pub matched: Match,
    pub centroid: Point<f64>,
    /// `false` when `centroid` is the `ORIGIN` fallback.
    pub geometry_valid: bool,
}

impl EnrichedFeature {
    #[inline] pub fn matched_value(&self) -> Option<f64> { self.matched.matched_value() }
}

/// Area-weighted centroid of a valid geometry, `None` if the geometry is invalid.
///
/// Concave shapes may get a point outside their outline.
pub fn representative_point(geometry: &MultiPolygon<f64>) -> Option<Point<f64>> {
    check_multipolygon(geometry).ok()?;
    geometry.centroid()
}

/// Attach a centroid to every joined feature. Invalid geometries get `ORIGIN`.
pub fn enrich(joined: Vec<JoinedFeature>) -> Vec<EnrichedFeature> {
    joined.into_iter()
        .map(|JoinedFeature { feature, matched }| {
            let (centroid, geometry_valid) = match check_multipolygon(feature.geometry()) {
                Ok(()) => match feature.geometry().centroid() {
                    Some(point) => (point, true),
                    None => (ORIGIN, false),
                },
                Err(issue) => {
                    warn!(
                        district = ?feature.district_id().map(|id| id.get()),
                        name = feature.name(),
                        %issue,
                        "invalid boundary geometry, label anchored at origin"
                    );
                    (ORIGIN, false)
                }
            };
            EnrichedFeature { feature, matched, centroid, geometry_valid }
        })
        .collect()
}
