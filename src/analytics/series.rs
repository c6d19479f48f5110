//! Ordering, daily rates and running cumulatives
//!
//! The source file's row order is never trusted: `derive_series` sorts by
//! (well, period, allocation date) before any cumulative sum. Downstream
//! code (summaries, EUR windows) relies on this ordering.

use serde::{Deserialize, Serialize};

use crate::types::WellRecord;

/// Counters for rate anomalies found while deriving
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDiagnostics {
    /// Records whose rates are undefined because effective time was zero
    pub undefined_rates: usize,
}

/// Sort records and populate the derived rate and cumulative fields.
///
/// Sorting is by (well_id, period, data_date) ascending. Rates are
/// volume / effective_time and stay `None` when effective time is zero —
/// a well that produced into a closed month contributes no rate sample,
/// rather than a zero that would bias peak extraction. Cumulatives are a
/// single left-to-right pass per well, seeded at zero on each well change.
pub fn derive_series(records: &mut [WellRecord]) -> SeriesDiagnostics {
    records.sort_by(|a, b| {
        a.well_id
            .cmp(&b.well_id)
            .then(a.period.cmp(&b.period))
            .then(a.data_date.cmp(&b.data_date))
    });

    let mut diagnostics = SeriesDiagnostics::default();

    let mut current_well: Option<String> = None;
    let mut np = 0.0;
    let mut gp = 0.0;
    let mut wp = 0.0;

    for rec in records.iter_mut() {
        if current_well.as_deref() != Some(rec.well_id.as_str()) {
            current_well = Some(rec.well_id.clone());
            np = 0.0;
            gp = 0.0;
            wp = 0.0;
        }

        if rec.effective_time > 0.0 {
            rec.oil_rate = Some(rec.oil_volume / rec.effective_time);
            rec.gas_rate = Some(rec.gas_volume / rec.effective_time);
            rec.water_rate = Some(rec.water_volume / rec.effective_time);
        } else {
            rec.oil_rate = None;
            rec.gas_rate = None;
            rec.water_rate = None;
            diagnostics.undefined_rates += 1;
        }

        np += rec.oil_volume;
        gp += rec.gas_volume;
        wp += rec.water_volume;
        rec.cumulative_oil = np;
        rec.cumulative_gas = gp;
        rec.cumulative_water = wp;
    }

    diagnostics
}
