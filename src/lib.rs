//! capiv: Production Analytics for Unconventional Well Datasets
//!
//! Typed, testable analytics over Argentina's "Capítulo IV" open-data
//! CSVs: monthly well production and hydraulic-fracture completions for
//! the Vaca Muerta shale play.
//!
//! ## Architecture
//!
//! - **Ingest**: header-mapped CSV parsing with drop-and-count diagnostics
//! - **Analytics**: pure transforms — ordering, rates, cumulatives (Np/Gp/Wp),
//!   GOR fluid classification, per-well summaries, EUR windows, rollups
//! - **Report**: one orchestration entry point over explicit parameters
//! - **Source**: fetch-and-cache of the remote datasets, keyed by URL
//!
//! Everything downstream of ingest is a synchronous pass over an immutable
//! snapshot; per-well summarization fans out by well id.

pub mod analytics;
pub mod config;
pub mod export;
pub mod ingest;
pub mod report;
pub mod source;
pub mod types;

// Re-export configuration
pub use config::AnalysisConfig;

// Re-export commonly used types
pub use types::{FluidType, FractureRecord, WellRecord, WellSummary};

// Re-export the pipeline surface
pub use ingest::{load_fracture_csv, load_production_csv, FractureTable, ProductionTable};
pub use report::{run_report, ProductionReport, ReportError, ReportParams};

// Re-export the dataset fetcher
pub use source::{DatasetCache, SourceError};
