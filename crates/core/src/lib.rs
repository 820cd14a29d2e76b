//! `panchanga-core` — shared data model for yearly almanac datasets.
//!
//! Pure types and parsing helpers shared by the reconciliation engine and
//! the CLI. No I/O.

pub mod model;
pub mod names;
pub mod time;

pub use model::{DayRecord, Event, EventKind, MasaLabels, YearlyDataset};
pub use names::canonical_name;
pub use time::{diff_minutes, format_ist, ist_midnight_epoch, parse_local, LOCAL_FORMAT};
