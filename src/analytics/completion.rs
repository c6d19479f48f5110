//! Completion (fracture) statistics by campaign
//!
//! The fracture adjunct arrives noisy: pilot holes, partial loads and
//! placeholder rows sit next to real completions. The published report cuts
//! those off before computing campaign statistics; the cutoffs live in
//! config with the published values as defaults.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::FracCutoffs;
use crate::types::FractureRecord;

/// Drop fracture rows failing the quality cutoffs.
///
/// Keeps rows with lateral length, stage count and total sand all strictly
/// above their cutoffs. Returns the kept rows and the dropped count.
pub fn apply_cutoffs(
    records: Vec<FractureRecord>,
    cutoffs: &FracCutoffs,
) -> (Vec<FractureRecord>, usize) {
    let before = records.len();
    let kept: Vec<FractureRecord> = records
        .into_iter()
        .filter(|r| {
            r.lateral_length_m > cutoffs.min_lateral_m
                && r.stage_count > cutoffs.min_stages
                && r.sand_total_tn() > cutoffs.min_sand_tn
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Completion statistics for one campaign year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignCompletionStats {
    /// Campaign: first production year of the wells completed
    pub start_year: i32,
    /// Completed wells in the campaign (after cutoffs)
    pub well_count: usize,

    /// Lateral length (m): min / mean / max / sample std-dev
    pub lateral_min_m: f64,
    pub lateral_mean_m: f64,
    pub lateral_max_m: f64,
    pub lateral_std_m: f64,

    /// Stage count: min / mean / max / sample std-dev
    pub stages_min: f64,
    pub stages_mean: f64,
    pub stages_max: f64,
    pub stages_std: f64,

    /// Proppant totals (t)
    pub sand_total_tn: f64,
    pub sand_domestic_tn: f64,
    pub sand_imported_tn: f64,
    /// Imported share of total sand, percent; 0 when no sand at all
    pub imported_sand_pct: f64,
}

/// Roll completion records up by campaign year.
///
/// `start_years` maps well id → first production year (from the production
/// table). Fracture rows whose well never produced have no campaign; they
/// are excluded and counted in the second return value.
pub fn completion_by_campaign(
    records: &[FractureRecord],
    start_years: &HashMap<String, i32>,
) -> (Vec<CampaignCompletionStats>, usize) {
    let mut by_year: BTreeMap<i32, Vec<&FractureRecord>> = BTreeMap::new();
    let mut unmatched = 0usize;

    for rec in records {
        match start_years.get(&rec.well_id) {
            Some(year) => by_year.entry(*year).or_default().push(rec),
            None => unmatched += 1,
        }
    }

    let stats = by_year
        .into_iter()
        .map(|(start_year, rows)| campaign_stats(start_year, &rows))
        .collect();

    (stats, unmatched)
}

fn campaign_stats(start_year: i32, rows: &[&FractureRecord]) -> CampaignCompletionStats {
    let laterals: Vec<f64> = rows.iter().map(|r| r.lateral_length_m).collect();
    let stages: Vec<f64> = rows.iter().map(|r| f64::from(r.stage_count)).collect();

    let sand_domestic_tn: f64 = rows.iter().map(|r| r.sand_domestic_tn).sum();
    let sand_imported_tn: f64 = rows.iter().map(|r| r.sand_imported_tn).sum();
    let sand_total_tn = sand_domestic_tn + sand_imported_tn;
    let imported_sand_pct = if sand_total_tn > 0.0 {
        sand_imported_tn / sand_total_tn * 100.0
    } else {
        0.0
    };

    CampaignCompletionStats {
        start_year,
        well_count: rows.len(),
        lateral_min_m: Statistics::min(laterals.iter()),
        lateral_mean_m: Statistics::mean(laterals.iter()),
        lateral_max_m: Statistics::max(laterals.iter()),
        lateral_std_m: sample_std(&laterals),
        stages_min: Statistics::min(stages.iter()),
        stages_mean: Statistics::mean(stages.iter()),
        stages_max: Statistics::max(stages.iter()),
        stages_std: sample_std(&stages),
        sand_total_tn,
        sand_domestic_tn,
        sand_imported_tn,
        imported_sand_pct,
    }
}

/// Sample standard deviation; 0 for fewer than two samples (statrs returns
/// NaN there, which would poison downstream tables).
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        Statistics::std_dev(values.iter())
    }
}
