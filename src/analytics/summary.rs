//! Per-well rollups: peak rates, final cumulatives, EUR windows
//!
//! Wells are independent, so summarization fans out across rayon workers —
//! each well's ordered sequence stays on exactly one worker and the final
//! collect is a pure, order-preserving reduce.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;

use super::classify::{classify_fluid, fluid_ratios, resolve_well_type};
use crate::config::AnalysisConfig;
use crate::types::{FluidType, WellRecord, WellSummary};

/// Campaign (first production year) per well.
pub fn well_start_years(records: &[WellRecord]) -> HashMap<String, i32> {
    let mut map: HashMap<String, i32> = HashMap::new();
    for rec in records {
        map.entry(rec.well_id.clone())
            .and_modify(|y| *y = (*y).min(rec.year))
            .or_insert(rec.year);
    }
    map
}

/// Slice a sorted record span into contiguous per-well groups.
///
/// Precondition: `records` ordered by `derive_series`.
fn well_groups(records: &[WellRecord]) -> Vec<&[WellRecord]> {
    let mut groups = Vec::new();
    let mut start = 0usize;
    for i in 1..=records.len() {
        if i == records.len() || records[i].well_id != records[start].well_id {
            groups.push(&records[start..i]);
            start = i;
        }
    }
    groups
}

/// Build one [`WellSummary`] per well.
///
/// Precondition: `records` has passed through `derive_series` (sorted,
/// rates and cumulatives populated).
pub fn summarize_wells(records: &[WellRecord], config: &AnalysisConfig) -> Vec<WellSummary> {
    well_groups(records)
        .par_iter()
        .map(|group| summarize_one(group, config))
        .collect()
}

fn summarize_one(group: &[WellRecord], config: &AnalysisConfig) -> WellSummary {
    let first = &group[0];
    let last = &group[group.len() - 1];

    let start_year = group.iter().map(|r| r.year).min().unwrap_or(first.year);

    let peak_oil_rate = peak(group.iter().filter_map(|r| r.oil_rate));
    let peak_gas_rate = peak(group.iter().filter_map(|r| r.gas_rate));
    let peak_water_rate = peak(group.iter().filter_map(|r| r.water_rate));

    let np = last.cumulative_oil;
    let gp = last.cumulative_gas;
    let wp = last.cumulative_water;

    let ratios = fluid_ratios(np, gp, wp, config.ratio_sentinel);
    let fluid_type = classify_fluid(np, ratios.gor, config.gor_threshold);
    let resolved_type = resolve_well_type(&first.well_type, fluid_type, config);

    let (eur_30, eur_90, eur_180) = eur_windows(group, first.period, fluid_type);

    WellSummary {
        well_id: first.well_id.clone(),
        company: config.canonical_company(&first.company).to_string(),
        field_area: first.field_area.clone(),
        formation: first.formation.clone(),
        start_year,
        start_date: first.period,
        record_count: group.len(),
        peak_oil_rate,
        peak_gas_rate,
        peak_water_rate,
        cumulative_oil: np,
        cumulative_gas: gp,
        cumulative_water: wp,
        gor: ratios.gor,
        wor: ratios.wor,
        wgr: ratios.wgr,
        declared_type: first.well_type.clone(),
        fluid_type,
        resolved_type,
        eur_30,
        eur_90,
        eur_180,
    }
}

/// Max over defined rate samples; `None` when every sample was undefined.
fn peak(samples: impl Iterator<Item = f64>) -> Option<f64> {
    samples.fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// Early-time cumulative windows at +30/+90/+180 calendar days.
///
/// The window test is calendar-day arithmetic on the period date — month
/// lengths vary, so a row-count shortcut would misplace the boundary. The
/// basis follows the fluid type: Np for oil wells, Gp for gas wells. A
/// window containing no record yields 0.
fn eur_windows(group: &[WellRecord], start: NaiveDate, basis: FluidType) -> (f64, f64, f64) {
    let mut out = [0.0f64; 3];
    for (slot, days) in [30i64, 90, 180].into_iter().enumerate() {
        let cutoff = start + Duration::days(days);
        out[slot] = group
            .iter()
            .filter(|r| r.period <= cutoff)
            .map(|r| match basis {
                FluidType::Oil => r.cumulative_oil,
                FluidType::Gas => r.cumulative_gas,
            })
            .fold(0.0, f64::max);
    }
    (out[0], out[1], out[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::series::derive_series;
    use crate::types::month_start;

    fn record(
        well: &str,
        year: i32,
        month: u32,
        oil: f64,
        gas: f64,
        tef: f64,
        well_type: &str,
    ) -> WellRecord {
        let period = month_start(year, month).unwrap();
        WellRecord {
            well_id: well.to_string(),
            year,
            month,
            period,
            oil_volume: oil,
            gas_volume: gas,
            water_volume: 0.0,
            gas_injection: 0.0,
            effective_time: tef,
            extraction_type: String::new(),
            well_type: well_type.to_string(),
            company: "ACME".to_string(),
            formation: "VMUT".to_string(),
            field_area: "LOMA".to_string(),
            data_date: period,
            oil_rate: None,
            gas_rate: None,
            water_rate: None,
            cumulative_oil: 0.0,
            cumulative_gas: 0.0,
            cumulative_water: 0.0,
        }
    }

    fn summarize(mut records: Vec<WellRecord>) -> Vec<WellSummary> {
        derive_series(&mut records);
        summarize_wells(&records, &AnalysisConfig::default())
    }

    /// Peak = max(100/30, 150/30, 200/30); the zero-tef month is excluded
    /// instead of dragging the peak to infinity or zero.
    #[test]
    fn test_peak_rate_excludes_undefined() {
        let summaries = summarize(vec![
            record("W-1", 2020, 1, 100.0, 0.0, 30.0, "Petrolífero"),
            record("W-1", 2020, 2, 150.0, 0.0, 30.0, "Petrolífero"),
            record("W-1", 2020, 3, 0.0, 0.0, 0.0, "Petrolífero"),
            record("W-1", 2020, 4, 200.0, 0.0, 30.0, "Petrolífero"),
        ]);
        let s = &summaries[0];
        assert!((s.peak_oil_rate.unwrap() - 200.0 / 30.0).abs() < 1e-9);
        assert!((s.cumulative_oil - 450.0).abs() < 1e-9);
        assert_eq!(s.record_count, 4);
        assert_eq!(s.start_year, 2020);
    }

    #[test]
    fn test_all_undefined_rates_yield_no_peak() {
        let summaries = summarize(vec![record("W-1", 2020, 1, 10.0, 1.0, 0.0, "Petrolífero")]);
        assert!(summaries[0].peak_oil_rate.is_none());
        assert!(summaries[0].peak_gas_rate.is_none());
    }

    #[test]
    fn test_gas_well_classification_and_basis() {
        // Never produced oil: sentinel GOR, gas basis for EUR
        let summaries = summarize(vec![
            record("W-G", 2020, 1, 0.0, 500.0, 30.0, "Otro tipo"),
            record("W-G", 2020, 2, 0.0, 300.0, 30.0, "Otro tipo"),
        ]);
        let s = &summaries[0];
        assert!((s.gor - 100_000.0).abs() < f64::EPSILON);
        assert_eq!(s.fluid_type, FluidType::Gas);
        assert_eq!(s.resolved_type, "Gasífero");
        // Gas basis: Gp at 30 days = first month only (Feb 1 > Jan 31)
        assert!((s.eur_30 - 500.0).abs() < 1e-9);
        assert!((s.eur_90 - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_declared_type_survives_classification() {
        // GOR 5000 > 3000 would say gas, but the permit says oil
        let summaries = summarize(vec![record("W-1", 2020, 1, 100.0, 500.0, 30.0, "Petrolífero")]);
        let s = &summaries[0];
        assert_eq!(s.fluid_type, FluidType::Gas);
        assert_eq!(s.resolved_type, "Petrolífero");
    }

    #[test]
    fn test_eur_windows_monotonic_and_calendar_based() {
        let summaries = summarize(vec![
            record("W-1", 2020, 1, 100.0, 0.0, 30.0, "Petrolífero"),
            record("W-1", 2020, 2, 80.0, 0.0, 28.0, "Petrolífero"),
            record("W-1", 2020, 3, 60.0, 0.0, 30.0, "Petrolífero"),
            record("W-1", 2020, 5, 40.0, 0.0, 30.0, "Petrolífero"),
            record("W-1", 2020, 9, 20.0, 0.0, 30.0, "Petrolífero"),
        ]);
        let s = &summaries[0];
        // start 2020-01-01: +30d = Jan 31 (Feb 1 excluded), +90d = Mar 31,
        // +180d = Jun 29 (Sep excluded)
        assert!((s.eur_30 - 100.0).abs() < 1e-9);
        assert!((s.eur_90 - 240.0).abs() < 1e-9);
        assert!((s.eur_180 - 280.0).abs() < 1e-9);
        assert!(s.eur_30 <= s.eur_90 && s.eur_90 <= s.eur_180);
    }

    #[test]
    fn test_company_canonicalization_in_summary() {
        let mut rec = record("W-1", 2020, 1, 10.0, 1.0, 30.0, "Petrolífero");
        rec.company = "PAN AMERICAN ENERGY SL".to_string();
        let summaries = summarize(vec![rec]);
        assert_eq!(summaries[0].company, "PAN AMERICAN ENERGY");
    }

    #[test]
    fn test_start_year_from_min_year() {
        let summaries = summarize(vec![
            record("W-1", 2021, 6, 10.0, 1.0, 30.0, "Petrolífero"),
            record("W-1", 2019, 11, 10.0, 1.0, 30.0, "Petrolífero"),
        ]);
        assert_eq!(summaries[0].start_year, 2019);
        assert_eq!(
            summaries[0].start_date,
            month_start(2019, 11).unwrap()
        );
    }

    #[test]
    fn test_well_start_years() {
        let records = vec![
            record("A", 2020, 1, 0.0, 0.0, 30.0, ""),
            record("A", 2018, 1, 0.0, 0.0, 30.0, ""),
            record("B", 2022, 1, 0.0, 0.0, 30.0, ""),
        ];
        let years = well_start_years(&records);
        assert_eq!(years.get("A"), Some(&2018));
        assert_eq!(years.get("B"), Some(&2022));
    }
}
