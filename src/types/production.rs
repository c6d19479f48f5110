//! Monthly production record types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First day of a production month, or `None` for an invalid year/month pair.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// One well-month of the Capítulo IV production table.
///
/// Upstream CSV column names in parentheses. Volumes are reported per
/// calendar month: oil and water in m³, gas in km³. Rates therefore come
/// out in m³/d (oil, water) and km³/d (gas).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellRecord {
    /// Well identifier ("sigla") — the primary key across datasets
    pub well_id: String,
    /// Production year (anio)
    pub year: i32,
    /// Production month 1-12 (mes)
    pub month: u32,
    /// First day of the production month, derived from year/month
    pub period: NaiveDate,
    /// Oil produced in the month (prod_pet, m³)
    pub oil_volume: f64,
    /// Gas produced in the month (prod_gas, km³)
    pub gas_volume: f64,
    /// Water produced in the month (prod_agua, m³)
    pub water_volume: f64,
    /// Gas injected in the month (iny_gas, km³)
    #[serde(default)]
    pub gas_injection: f64,
    /// Effective producing time in the month (tef, fractional days)
    pub effective_time: f64,
    /// Extraction method (tipoextraccion)
    pub extraction_type: String,
    /// Declared well type (tipopozo): "Petrolífero", "Gasífero", "Otro tipo", ...
    pub well_type: String,
    /// Operating company (empresa), as reported — aliases resolved downstream
    pub company: String,
    /// Producing formation (formacion)
    pub formation: String,
    /// Field area (areayacimiento)
    pub field_area: String,
    /// Allocation timestamp of the record (fecha_data); tie-break within a period
    pub data_date: NaiveDate,

    // === Derived (populated by analytics::series::derive_series) ===
    /// Oil rate (m³/d); `None` when effective_time is zero
    #[serde(default)]
    pub oil_rate: Option<f64>,
    /// Gas rate (km³/d); `None` when effective_time is zero
    #[serde(default)]
    pub gas_rate: Option<f64>,
    /// Water rate (m³/d); `None` when effective_time is zero
    #[serde(default)]
    pub water_rate: Option<f64>,
    /// Cumulative oil Np (m³) through this record
    #[serde(default)]
    pub cumulative_oil: f64,
    /// Cumulative gas Gp (km³) through this record
    #[serde(default)]
    pub cumulative_gas: f64,
    /// Cumulative water Wp (m³) through this record
    #[serde(default)]
    pub cumulative_water: f64,
}

/// Fluid classification of a well by produced-fluid composition
/// (McCain's GOR criterion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluidType {
    Oil,
    Gas,
}

impl FluidType {
    /// Label in the upstream dataset's `tipopozo` vocabulary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Oil => "Petrolífero",
            Self::Gas => "Gasífero",
        }
    }
}

impl std::fmt::Display for FluidType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_start() {
        assert_eq!(
            month_start(2020, 1),
            Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        );
        assert_eq!(month_start(2020, 13), None);
        assert_eq!(month_start(2020, 0), None);
    }

    #[test]
    fn test_fluid_type_labels() {
        assert_eq!(FluidType::Oil.label(), "Petrolífero");
        assert_eq!(FluidType::Gas.label(), "Gasífero");
        assert_eq!(format!("{}", FluidType::Gas), "Gasífero");
    }
}
