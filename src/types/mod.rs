//! Core data types for the Capítulo IV production and fracture datasets

mod fracture;
mod production;
mod summary;

pub use fracture::FractureRecord;
pub use production::{month_start, FluidType, WellRecord};
pub use summary::WellSummary;
