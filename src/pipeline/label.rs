use serde::Serialize;

use super::{centroid::EnrichedFeature, join::Match};

/// A point label for the map: the district name over its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelEntry {
    pub position: [f64; 2],
    pub text: String,
}

/// Render a value the way it is shown on labels: shortest round-trip form, always with
/// a fractional part (`1000.0`, `12.5`).
///
/// Magnitudes of `1e16` and above switch to exponent form without a sign (`1e16`, not `1e+16`).
#[inline]
pub fn format_value(value: f64) -> String {
    format!("{value:?}")
}

/// One label per matched feature, in feature order. Unmatched and unkeyed features, and rows
/// whose metric value is missing, get no label.
pub fn build_labels(features: &[EnrichedFeature]) -> Vec<LabelEntry> {
    features.iter()
        .filter_map(|enriched| match enriched.matched {
            Match::Found(Some(value)) => Some(LabelEntry {
                position: [enriched.centroid.x(), enriched.centroid.y()],
                text: format!("{}:\n{}", enriched.feature.name(), format_value(value)),
            }),
            _ => None,
        })
        .collect()
}
