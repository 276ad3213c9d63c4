use std::fmt;

use geo::{
    algorithm::validation::{InvalidMultiPolygon, InvalidPolygon},
    Area, MultiPolygon, RemoveRepeatedPoints, Validation,
};

/// Reason a geometry cannot be used to place a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryIssue {
    Empty,
    NonFinite,
    TooFewPoints,
    ZeroArea,
    SelfIntersection,
    /// A hole crosses, touches along a line, or lies outside its shell or another hole.
    RingsIntersect,
    /// Two parts of a multipolygon overlap or share an edge.
    PartsOverlap,
}

impl fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeometryIssue::Empty => "empty geometry",
            GeometryIssue::NonFinite => "non-finite coordinate",
            GeometryIssue::TooFewPoints => "ring with fewer than three distinct points",
            GeometryIssue::ZeroArea => "ring with zero area",
            GeometryIssue::SelfIntersection => "self-intersecting ring",
            GeometryIssue::RingsIntersect => "hole not cleanly inside its shell",
            GeometryIssue::PartsOverlap => "overlapping polygon parts",
        })
    }
}

impl From<InvalidMultiPolygon> for GeometryIssue {
    fn from(err: InvalidMultiPolygon) -> Self {
        match err {
            InvalidMultiPolygon::InvalidPolygon(_, err) => match err {
                InvalidPolygon::TooFewPointsInRing(_) => GeometryIssue::TooFewPoints,
                InvalidPolygon::SelfIntersection(_) => GeometryIssue::SelfIntersection,
                InvalidPolygon::NonFiniteCoord(..) => GeometryIssue::NonFinite,
                InvalidPolygon::InteriorRingNotContainedInExteriorRing(_)
                | InvalidPolygon::IntersectingRingsOnALine(..)
                | InvalidPolygon::IntersectingRingsOnAnArea(..) => GeometryIssue::RingsIntersect,
            },
            InvalidMultiPolygon::ElementsOverlaps(..)
            | InvalidMultiPolygon::ElementsTouchOnALine(..) => GeometryIssue::PartsOverlap,
        }
    }
}

/// Check a boundary geometry before computing its centroid.
///
/// Repeated consecutive vertices are dropped first. Structural checks are `geo`'s
/// [`Validation`]; empty geometries and zero-area polygons are rejected on top of that.
pub fn check_multipolygon(geometry: &MultiPolygon<f64>) -> Result<(), GeometryIssue> {
    if geometry.0.is_empty() || geometry.0.iter().any(|p| p.exterior().0.is_empty()) {
        return Err(GeometryIssue::Empty)
    }
    // Reject before `geo` runs intersection tests on NaN.
    let finite = geometry.0.iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .flat_map(|ring| ring.coords())
        .all(|c| c.x.is_finite() && c.y.is_finite());
    if !finite { return Err(GeometryIssue::NonFinite) }

    let cleaned = geometry.remove_repeated_points();
    cleaned.check_validation()?;

    if cleaned.0.iter().any(|p| p.unsigned_area() == 0.0) {
        return Err(GeometryIssue::ZeroArea)
    }
    Ok(())
}

#[inline]
pub fn is_valid(geometry: &MultiPolygon<f64>) -> bool {
    check_multipolygon(geometry).is_ok()
}
