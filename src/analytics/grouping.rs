//! Dimension rollups and the top-N + "Other" reduction
//!
//! Every dashboard variant in the source material is one of these two
//! transforms with different parameters: sum a rate by (dimension, period),
//! then optionally collapse the long tail of dimension values into a single
//! bucket.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::summary::well_start_years;
use crate::config::AnalysisConfig;
use crate::types::WellRecord;

/// Grouping dimension for rate rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Operating company, alias-resolved
    Company,
    /// Field area (areayacimiento)
    FieldArea,
    /// Campaign: the well's first production year
    StartYear,
}

/// Which per-record rate feeds the rollup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateMetric {
    /// Oil rate (m³/d)
    Oil,
    /// Gas rate (km³/d)
    Gas,
    /// Water rate (m³/d)
    Water,
}

impl RateMetric {
    fn of(self, rec: &WellRecord) -> Option<f64> {
        match self {
            Self::Oil => rec.oil_rate,
            Self::Gas => rec.gas_rate,
            Self::Water => rec.water_rate,
        }
    }
}

/// Period-indexed sums for one dimension value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedSeries {
    /// Dimension value ("VISTA", "LOMA CAMPANA", "2019", "Otros", ...)
    pub key: String,
    /// Sum of the metric per period, period-ascending
    pub points: BTreeMap<chrono::NaiveDate, f64>,
}

impl GroupedSeries {
    /// Total of the metric over all periods.
    pub fn total(&self) -> f64 {
        self.points.values().sum()
    }
}

/// Sum a rate metric by (dimension value, period).
///
/// Records with an undefined rate contribute nothing — they are skipped,
/// not counted as zero. Output is sorted by dimension value.
pub fn group_rate_series(
    records: &[WellRecord],
    dimension: Dimension,
    metric: RateMetric,
    config: &AnalysisConfig,
) -> Vec<GroupedSeries> {
    // StartYear needs the per-well campaign before rows can be keyed
    let start_years = match dimension {
        Dimension::StartYear => well_start_years(records),
        _ => HashMap::new(),
    };

    let mut buckets: BTreeMap<String, BTreeMap<chrono::NaiveDate, f64>> = BTreeMap::new();

    for rec in records {
        let Some(value) = metric.of(rec) else {
            continue;
        };
        let key = match dimension {
            Dimension::Company => config.canonical_company(&rec.company).to_string(),
            Dimension::FieldArea => rec.field_area.clone(),
            Dimension::StartYear => start_years
                .get(&rec.well_id)
                .copied()
                .unwrap_or(rec.year)
                .to_string(),
        };
        *buckets
            .entry(key)
            .or_default()
            .entry(rec.period)
            .or_insert(0.0) += value;
    }

    buckets
        .into_iter()
        .map(|(key, points)| GroupedSeries { key, points })
        .collect()
}

/// Keep the top N series by total metric and collapse the rest into one
/// bucket labelled `other_label`, re-aggregating per period.
///
/// The transform conserves the overall total. Output is the kept series in
/// rank order, with the Other bucket appended when non-empty.
pub fn top_n_with_other(
    mut series: Vec<GroupedSeries>,
    n: usize,
    other_label: &str,
) -> Vec<GroupedSeries> {
    if series.len() <= n {
        return series;
    }

    series.sort_by(|a, b| {
        b.total()
            .partial_cmp(&a.total())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let tail = series.split_off(n);
    let mut other: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for s in tail {
        for (period, value) in s.points {
            *other.entry(period).or_insert(0.0) += value;
        }
    }

    if !other.is_empty() {
        series.push(GroupedSeries {
            key: other_label.to_string(),
            points: other,
        });
    }
    series
}

/// Distinct well count per dimension value, descending.
pub fn distinct_well_counts(
    records: &[WellRecord],
    dimension: Dimension,
    config: &AnalysisConfig,
) -> Vec<(String, usize)> {
    let start_years = match dimension {
        Dimension::StartYear => well_start_years(records),
        _ => HashMap::new(),
    };

    let mut wells: BTreeMap<String, HashSet<&str>> = BTreeMap::new();
    for rec in records {
        let key = match dimension {
            Dimension::Company => config.canonical_company(&rec.company).to_string(),
            Dimension::FieldArea => rec.field_area.clone(),
            Dimension::StartYear => start_years
                .get(&rec.well_id)
                .copied()
                .unwrap_or(rec.year)
                .to_string(),
        };
        wells.entry(key).or_default().insert(rec.well_id.as_str());
    }

    let mut counts: Vec<(String, usize)> = wells
        .into_iter()
        .map(|(key, ids)| (key, ids.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
