//! Report orchestration
//!
//! One entry point, `run_report`, wires the whole pipeline: row filters →
//! series derivation → per-well summaries → dimension rollups → completion
//! statistics → field totals. Parameters are plain function arguments; the
//! only hard failure is an empty snapshot. Everything else is recovered
//! locally and surfaced through [`ReportDiagnostics`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analytics::{
    apply_cutoffs, completion_by_campaign, derive_series, distinct_well_counts, group_rate_series,
    summarize_wells, top_n_with_other, well_start_years, CampaignCompletionStats, Dimension,
    GroupedSeries, RateMetric,
};
use crate::config::AnalysisConfig;
use crate::ingest::{FractureTable, IngestDiagnostics, ProductionTable};
use crate::types::{WellRecord, WellSummary};

/// m³ to barrels
const M3_TO_BBL: f64 = 6.28981;

/// Report-level failure. Per-row problems never reach here.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("source '{0}' produced no valid rows to analyze")]
    EmptySource(String),
}

/// Caller-facing report parameters. Each `None` means "don't filter" /
/// "use the configured value".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportParams {
    /// Keep only this operator (matched after alias resolution)
    pub company: Option<String>,
    /// Keep only this field area
    pub field_area: Option<String>,
    /// Keep only wells of this campaign (first production year)
    pub start_year: Option<i32>,
    /// Override the configured GOR threshold
    pub gor_threshold: Option<f64>,
    /// Override the configured top-N
    pub top_n: Option<usize>,
}

/// Field-wide headline rates for the consolidated month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldTotals {
    /// The month the totals refer to
    pub period: NaiveDate,
    /// Total gas rate (MMm³/d)
    pub gas_rate_mmm3d: f64,
    /// Total oil rate (km³/d)
    pub oil_rate_km3d: f64,
    /// Total oil rate (kbpd)
    pub oil_rate_kbpd: f64,
}

/// Data-quality counters for the whole run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportDiagnostics {
    /// Production ingest counters
    pub production: IngestDiagnostics,
    /// Fracture ingest counters
    pub fracture: IngestDiagnostics,
    /// Records whose rates were undefined (zero effective time)
    pub undefined_rates: usize,
    /// Fracture rows removed by the quality cutoffs
    pub frac_rows_cut: usize,
    /// Fracture wells with no production history
    pub frac_wells_unmatched: usize,
    /// Wells summarized
    pub wells: usize,
}

/// Full analytics output for one parameter set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionReport {
    /// Newest period in the snapshot (allocation still in progress)
    pub latest_period: NaiveDate,
    /// Headline rates for the consolidated month
    pub totals: FieldTotals,
    /// One row per well
    pub summaries: Vec<WellSummary>,
    /// Normalized records (sorted, rates and cumulatives populated)
    pub records: Vec<WellRecord>,

    /// Gas rate by company, top-N + Other
    pub gas_by_company: Vec<GroupedSeries>,
    /// Oil rate by company, top-N + Other
    pub oil_by_company: Vec<GroupedSeries>,
    /// Gas rate by field area, top-N + Other
    pub gas_by_area: Vec<GroupedSeries>,
    /// Oil rate by field area, top-N + Other
    pub oil_by_area: Vec<GroupedSeries>,
    /// Gas rate by campaign year (no tail collapse — campaigns are few)
    pub gas_by_campaign: Vec<GroupedSeries>,
    /// Oil rate by campaign year
    pub oil_by_campaign: Vec<GroupedSeries>,

    /// Distinct producing wells per company, descending
    pub wells_by_company: Vec<(String, usize)>,
    /// Completion statistics per campaign (empty without fracture data)
    pub completion: Vec<CampaignCompletionStats>,

    pub diagnostics: ReportDiagnostics,
}

/// Run the full report over an ingested snapshot.
pub fn run_report(
    production: ProductionTable,
    fracture: Option<FractureTable>,
    config: &AnalysisConfig,
    params: &ReportParams,
) -> Result<ProductionReport, ReportError> {
    // Parameter overrides become the effective config for this run
    let mut config = config.clone();
    if let Some(threshold) = params.gor_threshold {
        config.gor_threshold = threshold;
    }
    if let Some(top_n) = params.top_n {
        config.top_n = top_n;
    }

    let mut diagnostics = ReportDiagnostics {
        production: production.diagnostics,
        ..Default::default()
    };

    // Row-level filters (company, area) come before any derivation
    let mut records: Vec<WellRecord> = production
        .records
        .into_iter()
        .filter(|rec| {
            params.company.as_deref().map_or(true, |c| {
                config.canonical_company(&rec.company) == config.canonical_company(c)
            }) && params
                .field_area
                .as_deref()
                .map_or(true, |a| rec.field_area == a)
        })
        .collect();

    if records.is_empty() {
        return Err(ReportError::EmptySource("production".to_string()));
    }

    diagnostics.undefined_rates = derive_series(&mut records).undefined_rates;

    // Campaign filter drops whole wells; cumulatives are per-well so the
    // already-derived series stays valid
    let start_years = well_start_years(&records);
    if let Some(year) = params.start_year {
        records.retain(|rec| start_years.get(&rec.well_id) == Some(&year));
        if records.is_empty() {
            return Err(ReportError::EmptySource("production".to_string()));
        }
    }

    let summaries = summarize_wells(&records, &config);
    diagnostics.wells = summaries.len();

    let rollup = |dim: Dimension, metric: RateMetric, collapse: bool| {
        let series = group_rate_series(&records, dim, metric, &config);
        if collapse {
            top_n_with_other(series, config.top_n, &config.other_label)
        } else {
            series
        }
    };

    let gas_by_company = rollup(Dimension::Company, RateMetric::Gas, true);
    let oil_by_company = rollup(Dimension::Company, RateMetric::Oil, true);
    let gas_by_area = rollup(Dimension::FieldArea, RateMetric::Gas, true);
    let oil_by_area = rollup(Dimension::FieldArea, RateMetric::Oil, true);
    let gas_by_campaign = rollup(Dimension::StartYear, RateMetric::Gas, false);
    let oil_by_campaign = rollup(Dimension::StartYear, RateMetric::Oil, false);

    let wells_by_company = distinct_well_counts(&records, Dimension::Company, &config);

    let completion = match fracture {
        Some(table) => {
            diagnostics.fracture = table.diagnostics;
            let (kept, cut) = apply_cutoffs(table.records, &config.frac_cutoffs);
            diagnostics.frac_rows_cut = cut;
            let (stats, unmatched) = completion_by_campaign(&kept, &start_years);
            diagnostics.frac_wells_unmatched = unmatched;
            stats
        }
        None => Vec::new(),
    };

    let latest_period = records
        .iter()
        .map(|r| r.period)
        .max()
        .ok_or_else(|| ReportError::EmptySource("production".to_string()))?;
    let totals = field_totals(&records, latest_period);

    info!(
        wells = diagnostics.wells,
        records = records.len(),
        undefined_rates = diagnostics.undefined_rates,
        consolidated = %totals.period,
        "Report computed"
    );

    Ok(ProductionReport {
        latest_period,
        totals,
        summaries,
        records,
        gas_by_company,
        oil_by_company,
        gas_by_area,
        oil_by_area,
        gas_by_campaign,
        oil_by_campaign,
        wells_by_company,
        completion,
        diagnostics,
    })
}

/// Headline rates for the consolidated month.
///
/// The official allocation for a month closes mid-way through the next one,
/// so the newest period in the snapshot is systematically incomplete. The
/// month before it is the newest *consolidated* month and is what the
/// totals report.
fn field_totals(records: &[WellRecord], latest_period: NaiveDate) -> FieldTotals {
    let period = previous_month(latest_period);

    let mut gas_km3d = 0.0;
    let mut oil_m3d = 0.0;
    for rec in records.iter().filter(|r| r.period == period) {
        if let Some(rate) = rec.gas_rate {
            gas_km3d += rate;
        }
        if let Some(rate) = rec.oil_rate {
            oil_m3d += rate;
        }
    }

    let oil_rate_km3d = oil_m3d / 1000.0;
    FieldTotals {
        period,
        gas_rate_mmm3d: gas_km3d / 1000.0,
        oil_rate_km3d,
        oil_rate_kbpd: oil_rate_km3d * M3_TO_BBL,
    }
}

fn previous_month(period: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    let (year, month) = if period.month() == 1 {
        (period.year() - 1, 12)
    } else {
        (period.year(), period.month() - 1)
    };
    crate::types::month_start(year, month).unwrap_or(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_production;
    use crate::types::month_start;
    use std::io::Cursor;

    const HEADER: &str =
        "sigla,anio,mes,prod_pet,prod_gas,prod_agua,iny_gas,tef,tipoextraccion,tipopozo,empresa,formacion,areayacimiento,fecha_data";

    fn table(body: &str) -> ProductionTable {
        parse_production(Cursor::new(format!("{HEADER}\n{body}"))).unwrap()
    }

    fn two_month_table() -> ProductionTable {
        table(
            "W-1,2024,1,3000,100,10,0,30,,Petrolífero,ACME,VMUT,LOMA,2024-02-15\n\
             W-1,2024,2,2000,90,10,0,29,,Petrolífero,ACME,VMUT,LOMA,2024-03-15\n\
             W-2,2024,1,0,6000,0,0,30,,Otro tipo,BETA,VMUT,AGUADA,2024-02-15\n\
             W-2,2024,2,0,5000,0,0,29,,Otro tipo,BETA,VMUT,AGUADA,2024-03-15",
        )
    }

    #[test]
    fn test_empty_source_is_fatal() {
        let empty = table("");
        let err = run_report(
            empty,
            None,
            &AnalysisConfig::default(),
            &ReportParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::EmptySource(_)));
    }

    #[test]
    fn test_filter_to_unknown_company_is_fatal() {
        let err = run_report(
            two_month_table(),
            None,
            &AnalysisConfig::default(),
            &ReportParams {
                company: Some("NOBODY".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::EmptySource(_)));
    }

    #[test]
    fn test_full_report_shape() {
        let report = run_report(
            two_month_table(),
            None,
            &AnalysisConfig::default(),
            &ReportParams::default(),
        )
        .unwrap();

        assert_eq!(report.diagnostics.wells, 2);
        assert_eq!(report.latest_period, month_start(2024, 2).unwrap());
        assert_eq!(report.totals.period, month_start(2024, 1).unwrap());
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(report.gas_by_company.len(), 2);
        assert!(report.completion.is_empty());

        // W-2 never produced oil → gas well via sentinel GOR
        let w2 = report
            .summaries
            .iter()
            .find(|s| s.well_id == "W-2")
            .unwrap();
        assert_eq!(w2.resolved_type, "Gasífero");
    }

    #[test]
    fn test_consolidated_totals_use_previous_month() {
        let report = run_report(
            two_month_table(),
            None,
            &AnalysisConfig::default(),
            &ReportParams::default(),
        )
        .unwrap();

        // January totals: oil 3000/30 = 100 m³/d, gas (100 + 6000)/30 km³/d
        let totals = report.totals;
        assert!((totals.oil_rate_km3d - 0.1).abs() < 1e-9);
        assert!((totals.gas_rate_mmm3d - (6100.0 / 30.0) / 1000.0).abs() < 1e-9);
        assert!((totals.oil_rate_kbpd - 0.1 * 6.28981).abs() < 1e-9);
    }

    #[test]
    fn test_company_filter_respects_aliases() {
        let t = table(
            "W-1,2024,1,100,10,0,0,30,,Petrolífero,VISTA ENERGY ARGENTINA SAU,VMUT,LOMA,2024-02-15\n\
             W-2,2024,1,100,10,0,0,30,,Petrolífero,Vista Oil & Gas Argentina SA,VMUT,LOMA,2024-02-15\n\
             W-3,2024,1,100,10,0,0,30,,Petrolífero,ACME,VMUT,LOMA,2024-02-15",
        );
        let report = run_report(
            t,
            None,
            &AnalysisConfig::default(),
            &ReportParams {
                company: Some("VISTA".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(report.diagnostics.wells, 2);
    }

    #[test]
    fn test_campaign_filter_keeps_whole_wells() {
        let t = table(
            "W-1,2023,12,100,10,0,0,30,,Petrolífero,ACME,VMUT,LOMA,2024-01-15\n\
             W-1,2024,1,100,10,0,0,30,,Petrolífero,ACME,VMUT,LOMA,2024-02-15\n\
             W-2,2024,1,100,10,0,0,30,,Petrolífero,ACME,VMUT,LOMA,2024-02-15",
        );
        let report = run_report(
            t,
            None,
            &AnalysisConfig::default(),
            &ReportParams {
                start_year: Some(2023),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(report.diagnostics.wells, 1);
        // Both of W-1's records survive, including the 2024 one
        assert_eq!(report.records.len(), 2);
    }

    #[test]
    fn test_gor_threshold_override() {
        // GOR = (100 / 3000) * 1000 ≈ 33.3 under default units... use a
        // well with GOR 2000: Np = 100, Gp = 200 → GOR = 2000
        let t = table(
            "W-1,2024,1,100,200,0,0,30,,Otro tipo,ACME,VMUT,LOMA,2024-02-15\n\
             W-1,2024,2,0,0,0,0,0,,Otro tipo,ACME,VMUT,LOMA,2024-03-15",
        );
        let default_report = run_report(
            t.clone(),
            None,
            &AnalysisConfig::default(),
            &ReportParams::default(),
        )
        .unwrap();
        assert_eq!(default_report.summaries[0].resolved_type, "Petrolífero");

        let strict = run_report(
            t,
            None,
            &AnalysisConfig::default(),
            &ReportParams {
                gor_threshold: Some(1000.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(strict.summaries[0].resolved_type, "Gasífero");
    }

    #[test]
    fn test_previous_month_year_boundary() {
        assert_eq!(
            previous_month(month_start(2024, 1).unwrap()),
            month_start(2023, 12).unwrap()
        );
        assert_eq!(
            previous_month(month_start(2024, 7).unwrap()),
            month_start(2024, 6).unwrap()
        );
    }
}
