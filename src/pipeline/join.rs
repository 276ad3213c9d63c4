use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use crate::{boundary::{BoundaryFeature, BoundarySet}, table::{DistrictRecord, YearSlice}, types::DistrictId};

/// Outcome of looking a boundary up in the year's statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Match {
    /// A row exists for the district. `None` when the metric cell was not numeric.
    Found(Option<f64>),
    /// The district has no row for the year, or the metric column is absent.
    Missing,
    /// The boundary has no district id and is passed through untouched.
    Unkeyed,
}

impl Match {
    /// Value to paint: the row's value, `0.0` for a missing row, nothing for unkeyed features.
    #[inline]
    pub fn matched_value(self) -> Option<f64> {
        match self {
            Match::Found(value) => value,
            Match::Missing => Some(0.0),
            Match::Unkeyed => None,
        }
    }

    #[inline] pub fn is_found(self) -> bool { matches!(self, Match::Found(_)) }
}

/// A boundary paired with its statistics lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFeature {
    pub feature: Arc<BoundaryFeature>,
    pub matched: Match,
}

/// Left outer join of boundaries against one year of statistics on `district_id`.
///
/// Every boundary yields exactly one output, in input order. When several rows share a
/// district id the first one wins. A metric the table does not carry matches nothing.
pub fn join(boundaries: &BoundarySet, table: &YearSlice<'_>, metric: &str) -> Vec<JoinedFeature> {
    let column = table.metric_index(metric);
    if column.is_none() {
        debug!(metric, "metric column absent, every keyed feature is unmatched");
    }

    let mut lookup: AHashMap<DistrictId, &DistrictRecord> = AHashMap::with_capacity(table.len());
    for &row in table.rows() {
        lookup.entry(row.district_id).or_insert(row);
    }

    boundaries.iter()
        .map(|feature| {
            let matched = match feature.district_id() {
                None => Match::Unkeyed,
                Some(id) => match (lookup.get(&id), column) {
                    (Some(row), Some(index)) => Match::Found(row.value(index)),
                    _ => Match::Missing,
                },
            };
            JoinedFeature { feature: Arc::clone(feature), matched }
        })
        .collect()
}
