//! Analysis configuration
//!
//! Every tunable the report variants disagreed on (GOR threshold, top-N,
//! fracture quality cutoffs, company aliases) is a field here instead of a
//! constant buried in a computation. Each struct implements `Default` with
//! values matching the published report, so behavior is unchanged when no
//! config file is present.
//!
//! ## Loading order
//!
//! 1. `CAPIV_CONFIG` environment variable (path to TOML file)
//! 2. `capiv.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The config is passed explicitly into analytics functions; there is no
//! process-global instance.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Config loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an analysis run.
///
/// Load with `AnalysisConfig::load()` which searches:
/// 1. `$CAPIV_CONFIG` env var
/// 2. `./capiv.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// GOR above which a well classifies as gas (m³/m³). McCain's criterion;
    /// published report variants used 3000 and 15000 — this is a knob, not
    /// a constant.
    pub gor_threshold: f64,

    /// Value substituted for GOR/WOR/WGR when the denominator cumulative
    /// is zero. Large so that zero-oil wells always classify as gas.
    pub ratio_sentinel: f64,

    /// Dimension values kept before collapsing the tail into `other_label`
    pub top_n: usize,

    /// Bucket label for collapsed dimension values
    pub other_label: String,

    /// Declared well types that GOR classification may override. Any
    /// declared type outside this set is kept verbatim.
    pub unclassified_types: Vec<String>,

    /// Raw company name → canonical name. The source data carries several
    /// legal-entity spellings per operator.
    pub company_aliases: HashMap<String, String>,

    /// Fracture-record quality cutoffs
    pub frac_cutoffs: FracCutoffs,

    /// Downloaded-dataset cache behavior
    pub cache: CacheConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            gor_threshold: 3000.0,
            ratio_sentinel: 100_000.0,
            top_n: 10,
            other_label: "Otros".to_string(),
            unclassified_types: vec!["Otro tipo".to_string()],
            company_aliases: default_company_aliases(),
            frac_cutoffs: FracCutoffs::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Fracture rows below these cutoffs are treated as data-entry noise
/// (pilot holes, partial loads) and dropped with a count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FracCutoffs {
    /// Keep rows with lateral length strictly above this (m)
    pub min_lateral_m: f64,
    /// Keep rows with stage count strictly above this
    pub min_stages: u32,
    /// Keep rows with total sand strictly above this (t)
    pub min_sand_tn: f64,
}

impl Default for FracCutoffs {
    fn default() -> Self {
        Self {
            min_lateral_m: 100.0,
            min_stages: 6,
            min_sand_tn: 100.0,
        }
    }
}

/// Cache behavior for downloaded source datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Re-download a cached file older than this. The upstream portal
    /// updates daily.
    pub max_age_hours: u64,
    /// Cache directory override; platform cache dir when unset
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_hours: 24,
            dir: None,
        }
    }
}

fn default_company_aliases() -> HashMap<String, String> {
    [
        (
            "PAN AMERICAN ENERGY (SUCURSAL ARGENTINA) LLC",
            "PAN AMERICAN ENERGY",
        ),
        ("PAN AMERICAN ENERGY SL", "PAN AMERICAN ENERGY"),
        ("VISTA ENERGY ARGENTINA SAU", "VISTA"),
        ("Vista Oil & Gas Argentina SA", "VISTA"),
        ("VISTA OIL & GAS ARGENTINA SAU", "VISTA"),
        ("WINTERSHALL DE ARGENTINA S.A.", "WINTERSHALL"),
        ("WINTERSHALL ENERGÍA S.A.", "WINTERSHALL"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl AnalysisConfig {
    /// Load configuration using the standard search order:
    /// 1. `$CAPIV_CONFIG` environment variable
    /// 2. `./capiv.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("CAPIV_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analysis config from CAPIV_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from CAPIV_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "CAPIV_CONFIG points to non-existent file, falling back");
            }
        }

        let cwd_config = Path::new("capiv.toml");
        if cwd_config.exists() {
            match Self::load_from_file(cwd_config) {
                Ok(config) => {
                    info!("Loaded analysis config from ./capiv.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./capiv.toml, using defaults");
                }
            }
        }

        Self::default()
    }

    /// Load configuration from an explicit TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Canonical operator name for a raw `empresa` value.
    pub fn canonical_company<'a>(&'a self, raw: &'a str) -> &'a str {
        self.company_aliases
            .get(raw)
            .map_or(raw, String::as_str)
    }

    /// Whether a declared well type may be overridden by GOR classification.
    ///
    /// Empty / whitespace-only declarations count as unclassified.
    pub fn is_unclassified(&self, declared: &str) -> bool {
        let declared = declared.trim();
        declared.is_empty()
            || self
                .unclassified_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(declared))
    }
}
