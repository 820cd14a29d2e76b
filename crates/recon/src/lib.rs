//! `panchanga-recon` — day-by-day almanac reconciliation engine.
//!
//! Pure engine crate: receives two pre-loaded yearly datasets, returns a
//! [`ComparisonResult`]. No CLI or IO dependencies.

pub mod engine;
pub mod error;
pub mod model;
pub mod stats;

pub use engine::reconcile;
pub use error::ReconError;
pub use model::{
    Category, ComparisonResult, CoverageViolation, DiffRecord, DiffSeries, MasaConvention,
    MasaMismatch, TimeField,
};
pub use stats::DiffStats;
