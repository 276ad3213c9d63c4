use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::types::DistrictId;

/// One row of the statistics table: a district in a reference year.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictRecord {
    pub district_id: DistrictId,
    pub year: i32,
    values: Vec<Option<f64>>, // Aligned with `TabularDataset::metrics`, `None` marks a missing value.
}

impl DistrictRecord {
    pub fn new(district_id: DistrictId, year: i32, values: Vec<Option<f64>>) -> Self {
        Self { district_id, year, values }
    }

    /// Value of the metric at `index`, `None` if missing or out of range.
    #[inline]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    #[inline] pub fn values(&self) -> &[Option<f64>] { &self.values }
}

/// Normalized per-district, per-year statistics with a fixed list of metric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDataset {
    metrics: Vec<String>,
    records: Vec<DistrictRecord>,
}

impl TabularDataset {
    /// Build a dataset. Rows repeating an earlier `(district_id, year)` pair are dropped,
    /// the first one wins.
    pub fn new(metrics: Vec<String>, records: Vec<DistrictRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert((record.district_id, record.year)) {
                unique.push(record);
            } else {
                warn!(district = %record.district_id, year = record.year, "duplicate district row ignored");
            }
        }
        Self { metrics, records: unique }
    }

    #[inline] pub fn metrics(&self) -> &[String] { &self.metrics }

    #[inline] pub fn records(&self) -> &[DistrictRecord] { &self.records }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Column index of `metric`, if the dataset carries it.
    #[inline]
    pub fn metric_index(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m == metric)
    }

    /// Sorted unique reference years.
    pub fn years(&self) -> Vec<i32> {
        self.records.iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows whose year equals `year` exactly, in table order.
    pub fn for_year(&self, year: i32) -> YearSlice<'_> {
        YearSlice {
            dataset: self,
            year,
            rows: self.records.iter().filter(|r| r.year == year).collect(),
        }
    }

    /// `(district, value)` pairs for one year and metric, ordered by district id.
    /// An unknown metric yields all-missing values.
    pub fn district_series(&self, year: i32, metric: &str) -> Vec<(DistrictId, Option<f64>)> {
        let index = self.metric_index(metric);
        let mut series: Vec<_> = self.for_year(year).rows().iter()
            .map(|r| (r.district_id, index.and_then(|i| r.value(i))))
            .collect();
        series.sort_by_key(|(id, _)| *id);
        series
    }
}

/// The dataset filtered down to a single reference year.
#[derive(Debug, Clone)]
pub struct YearSlice<'a> {
    dataset: &'a TabularDataset,
    year: i32,
    rows: Vec<&'a DistrictRecord>,
}

impl<'a> YearSlice<'a> {
    #[inline] pub fn year(&self) -> i32 { self.year }

    #[inline] pub fn rows(&self) -> &[&'a DistrictRecord] { &self.rows }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    #[inline]
    pub fn metric_index(&self, metric: &str) -> Option<usize> {
        self.dataset.metric_index(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, year: i32, value: Option<f64>) -> DistrictRecord {
        DistrictRecord::new(DistrictId(id), year, vec![value])
    }

    fn dataset() -> TabularDataset {
        TabularDataset::new(vec!["PKW_VALUE".into()], vec![
            record(2, 2020, Some(20.0)),
            record(1, 2020, Some(10.0)),
            record(1, 2021, None),
            record(1, 2020, Some(99.0)),
        ])
    }

    #[test]
    fn duplicates_keep_first_row() {
        let ds = dataset();
        assert_eq!(ds.len(), 3);
        let slice = ds.for_year(2020);
        assert_eq!(slice.len(), 2);
        assert_eq!(slice.rows()[1].value(0), Some(10.0));
    }

    #[test]
    fn years_are_sorted_and_unique() {
        assert_eq!(dataset().years(), vec![2020, 2021]);
    }

    #[test]
    fn unknown_year_is_empty_not_an_error() {
        let ds = dataset();
        let slice = ds.for_year(1999);
        assert!(slice.is_empty());
        assert_eq!(slice.year(), 1999);
    }

    #[test]
    fn series_is_sorted_by_district() {
        let ds = dataset();
        assert_eq!(
            ds.district_series(2020, "PKW_VALUE"),
            vec![(DistrictId(1), Some(10.0)), (DistrictId(2), Some(20.0))]
        );
        assert_eq!(ds.district_series(2021, "PKW_VALUE"), vec![(DistrictId(1), None)]);
        assert_eq!(ds.district_series(2020, "NOPE")[0].1, None);
    }

    #[test]
    fn out_of_range_value_is_missing() {
        let r = record(1, 2020, Some(1.0));
        assert_eq!(r.value(0), Some(1.0));
        assert_eq!(r.value(3), None);
    }
}
