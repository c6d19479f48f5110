//! Per-well summary output type

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FluidType;

/// Derived aggregate for one well — the main analytics output row.
///
/// Built by `analytics::summary::summarize_wells` from a well's ordered
/// record series. All cumulative fields are taken at the well's last record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellSummary {
    /// Well identifier ("sigla")
    pub well_id: String,
    /// Operating company, alias-resolved to its canonical name
    pub company: String,
    /// Field area (areayacimiento)
    pub field_area: String,
    /// Producing formation (formacion)
    pub formation: String,
    /// Campaign: minimum production year across the well's records
    pub start_year: i32,
    /// Period of the well's first record
    pub start_date: NaiveDate,
    /// Number of monthly records loaded for the well
    pub record_count: usize,

    /// Peak oil rate (m³/d) over defined samples; `None` if every sample
    /// had zero effective time
    pub peak_oil_rate: Option<f64>,
    /// Peak gas rate (km³/d) over defined samples
    pub peak_gas_rate: Option<f64>,
    /// Peak water rate (m³/d) over defined samples
    pub peak_water_rate: Option<f64>,

    /// Final cumulative oil Np (m³)
    pub cumulative_oil: f64,
    /// Final cumulative gas Gp (km³)
    pub cumulative_gas: f64,
    /// Final cumulative water Wp (m³)
    pub cumulative_water: f64,

    /// Gas-oil ratio Gp/Np × 1000 (m³/m³); sentinel when Np = 0
    pub gor: f64,
    /// Water-oil ratio Wp/Np; sentinel when Np = 0
    pub wor: f64,
    /// Water-gas ratio Wp/Gp × 1000; sentinel when Gp = 0
    pub wgr: f64,

    /// Well type as declared in the source data (tipopozo)
    pub declared_type: String,
    /// Fluid classification by GOR threshold
    pub fluid_type: FluidType,
    /// Effective type: declared unless unclassified, then `fluid_type`'s label
    pub resolved_type: String,

    /// Cumulative production through start_date + 30 days, on the
    /// fluid-type basis (Np in m³ for oil wells, Gp in km³ for gas wells)
    pub eur_30: f64,
    /// Cumulative production through start_date + 90 days
    pub eur_90: f64,
    /// Cumulative production through start_date + 180 days
    pub eur_180: f64,
}
