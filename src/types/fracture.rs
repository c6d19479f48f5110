//! Hydraulic-fracturing (completion) record types

use serde::{Deserialize, Serialize};

/// One completed well of the fracture adjunct dataset.
///
/// Static per well: the dataset carries one row per completion, not a time
/// series. Upstream CSV column names in parentheses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractureRecord {
    /// Well identifier ("sigla"), joins against the production table
    pub well_id: String,
    /// Horizontal lateral length (longitud_rama_horizontal_m, m)
    pub lateral_length_m: f64,
    /// Number of frac stages (cantidad_fracturas)
    pub stage_count: u32,
    /// Completion type (tipo_terminacion)
    pub completion_type: String,
    /// Domestic proppant pumped (arena_bombeada_nacional_tn, t)
    pub sand_domestic_tn: f64,
    /// Imported proppant pumped (arena_bombeada_importada_tn, t)
    pub sand_imported_tn: f64,
}

impl FractureRecord {
    /// Total proppant pumped, domestic plus imported (t).
    pub fn sand_total_tn(&self) -> f64 {
        self.sand_domestic_tn + self.sand_imported_tn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sand_total() {
        let rec = FractureRecord {
            well_id: "X-1".to_string(),
            lateral_length_m: 2500.0,
            stage_count: 38,
            completion_type: "Plug & Perf".to_string(),
            sand_domestic_tn: 3200.0,
            sand_imported_tn: 800.0,
        };
        assert!((rec.sand_total_tn() - 4000.0).abs() < 1e-9);
    }
}
