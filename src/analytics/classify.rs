//! Fluid-type classification by gas-oil ratio
//!
//! McCain's criterion: a well whose producing GOR exceeds a threshold is a
//! gas well regardless of how it was permitted. The threshold is always a
//! parameter — report variants in circulation use anything from 3000 to
//! 15000 m³/m³.

use crate::config::AnalysisConfig;
use crate::types::FluidType;

/// Produced-fluid ratios at a cumulative snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidRatios {
    /// Gas-oil ratio, Gp/Np × 1000 (m³/m³)
    pub gor: f64,
    /// Water-oil ratio, Wp/Np
    pub wor: f64,
    /// Water-gas ratio, Wp/Gp × 1000
    pub wgr: f64,
}

/// Compute GOR/WOR/WGR from final cumulatives.
///
/// Gas cumulatives arrive in km³ while oil and water are m³, so the ×1000
/// puts GOR and WGR in m³/m³. A zero denominator substitutes `sentinel`
/// (documented, not a silent zero) so downstream comparisons stay total.
pub fn fluid_ratios(np: f64, gp: f64, wp: f64, sentinel: f64) -> FluidRatios {
    FluidRatios {
        gor: if np == 0.0 { sentinel } else { (gp / np) * 1000.0 },
        wor: if np == 0.0 { sentinel } else { wp / np },
        wgr: if gp == 0.0 { sentinel } else { (wp / gp) * 1000.0 },
    }
}

/// Classify a well as oil or gas from its cumulative snapshot.
///
/// Gas iff the well never produced oil or its GOR exceeds the threshold.
/// Pure in its inputs: identical snapshots always yield the same label.
pub fn classify_fluid(np: f64, gor: f64, threshold: f64) -> FluidType {
    if np == 0.0 || gor > threshold {
        FluidType::Gas
    } else {
        FluidType::Oil
    }
}

/// Resolve the effective well type.
///
/// A declared type that is a real category ("Petrolífero", "Inyección de
/// Agua", ...) wins; only the unclassified bucket ("Otro tipo", empty) is
/// replaced by the GOR classification.
pub fn resolve_well_type(declared: &str, fluid: FluidType, config: &AnalysisConfig) -> String {
    if config.is_unclassified(declared) {
        fluid.label().to_string()
    } else {
        declared.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: f64 = 100_000.0;

    #[test]
    fn test_zero_oil_gets_sentinel_gor_and_gas_label() {
        let ratios = fluid_ratios(0.0, 500.0, 0.0, SENTINEL);
        assert!((ratios.gor - SENTINEL).abs() < f64::EPSILON);
        assert_eq!(
            classify_fluid(0.0, ratios.gor, 3000.0),
            FluidType::Gas
        );
    }

    #[test]
    fn test_low_gor_is_oil() {
        // Np = 100 m³, Gp = 50 km³ → GOR = 500 ≤ 3000
        let ratios = fluid_ratios(100.0, 50.0, 0.0, SENTINEL);
        assert!((ratios.gor - 500.0).abs() < 1e-9);
        assert_eq!(classify_fluid(100.0, ratios.gor, 3000.0), FluidType::Oil);
    }

    #[test]
    fn test_high_gor_is_gas() {
        // Np = 100 m³, Gp = 400 km³ → GOR = 4000 > 3000
        let ratios = fluid_ratios(100.0, 400.0, 0.0, SENTINEL);
        assert_eq!(classify_fluid(100.0, ratios.gor, 3000.0), FluidType::Gas);
        // Same snapshot under the loose threshold flips to oil
        assert_eq!(classify_fluid(100.0, ratios.gor, 15000.0), FluidType::Oil);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let ratios = fluid_ratios(123.4, 567.8, 9.0, SENTINEL);
        let first = classify_fluid(123.4, ratios.gor, 3000.0);
        for _ in 0..10 {
            assert_eq!(classify_fluid(123.4, ratios.gor, 3000.0), first);
        }
    }

    #[test]
    fn test_wor_wgr_sentinels() {
        let ratios = fluid_ratios(0.0, 0.0, 10.0, SENTINEL);
        assert!((ratios.wor - SENTINEL).abs() < f64::EPSILON);
        assert!((ratios.wgr - SENTINEL).abs() < f64::EPSILON);

        let ratios = fluid_ratios(10.0, 2.0, 5.0, SENTINEL);
        assert!((ratios.wor - 0.5).abs() < 1e-9);
        assert!((ratios.wgr - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_declared_type_precedence() {
        let config = AnalysisConfig::default();
        assert_eq!(
            resolve_well_type("Inyección de Agua", FluidType::Gas, &config),
            "Inyección de Agua"
        );
        assert_eq!(
            resolve_well_type("Petrolífero", FluidType::Gas, &config),
            "Petrolífero"
        );
        assert_eq!(
            resolve_well_type("Otro tipo", FluidType::Gas, &config),
            "Gasífero"
        );
        assert_eq!(
            resolve_well_type("", FluidType::Oil, &config),
            "Petrolífero"
        );
    }
}
