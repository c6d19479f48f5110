//! Production analytics core
//!
//! Deterministic tabular arithmetic over in-memory record snapshots. All
//! functions here are pure transforms — no I/O, no shared state, no retry
//! concept. Per-row anomalies (zero effective time, zero denominators)
//! are represented in the types, never raised.
//!
//! - `series` — mandatory ordering, daily rates, running cumulatives
//! - `classify` — GOR ratios and fluid-type classification (McCain)
//! - `summary` — per-well rollup: peaks, finals, EUR windows
//! - `grouping` — period-indexed sums by dimension, top-N + Other
//! - `completion` — fracture quality cutoffs and campaign statistics

pub mod classify;
pub mod completion;
pub mod grouping;
pub mod series;
pub mod summary;

pub use classify::{classify_fluid, fluid_ratios, resolve_well_type, FluidRatios};
pub use completion::{apply_cutoffs, completion_by_campaign, CampaignCompletionStats};
pub use grouping::{
    distinct_well_counts, group_rate_series, top_n_with_other, Dimension, GroupedSeries,
    RateMetric,
};
pub use series::{derive_series, SeriesDiagnostics};
pub use summary::{summarize_wells, well_start_years};
