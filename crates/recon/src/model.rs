use std::fmt;

use chrono::NaiveDate;
use panchanga_core::EventKind;
use serde::Serialize;

use crate::stats::{self, DiffStats};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Everything that accumulates difference samples: the three event
/// categories plus the per-day sunrise instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tithi,
    Nakshatra,
    Yoga,
    Sunrise,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Tithi,
        Category::Nakshatra,
        Category::Yoga,
        Category::Sunrise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tithi => "tithi",
            Self::Nakshatra => "nakshatra",
            Self::Yoga => "yoga",
            Self::Sunrise => "sunrise",
        }
    }

    /// Capitalized form for report headers.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Tithi => "Tithi",
            Self::Nakshatra => "Nakshatra",
            Self::Yoga => "Yoga",
            Self::Sunrise => "Sunrise",
        }
    }
}

impl From<EventKind> for Category {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Tithi => Self::Tithi,
            EventKind::Nakshatra => Self::Nakshatra,
            EventKind::Yoga => Self::Yoga,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which timestamp of a pairing produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    StartTime,
    EndTime,
    Sunrise,
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTime => f.write_str("start_time"),
            Self::EndTime => f.write_str("end_time"),
            Self::Sunrise => f.write_str("sunrise"),
        }
    }
}

// ---------------------------------------------------------------------------
// Difference samples
// ---------------------------------------------------------------------------

/// One matched timestamp pair and its absolute difference in minutes.
#[derive(Debug, Clone, Serialize)]
pub struct DiffRecord {
    pub day: NaiveDate,
    /// Event name for tithi/nakshatra/yoga samples; `None` for sunrise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub field: TimeField,
    pub original: String,
    pub computed: String,
    pub minutes: f64,
}

/// All samples for one category, in day-iteration order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffSeries {
    pub records: Vec<DiffRecord>,
    pub max_diff: f64,
}

impl DiffSeries {
    pub fn push(&mut self, record: DiffRecord) {
        if record.minutes > self.max_diff {
            self.max_diff = record.minutes;
        }
        self.records.push(record);
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Aggregate statistics, or `None` when the category has no samples.
    pub fn stats(&self) -> Option<DiffStats> {
        stats::compute(self)
    }

    /// Records whose difference exceeds `threshold` minutes.
    pub fn over(&self, threshold: f64) -> impl Iterator<Item = &DiffRecord> {
        self.records.iter().filter(move |r| r.minutes > threshold)
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MasaConvention {
    Amanta,
    Purnima,
}

impl fmt::Display for MasaConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amanta => f.write_str("amanta"),
            Self::Purnima => f.write_str("purnima"),
        }
    }
}

/// Lunar-month label disagreement on one day, under one convention.
#[derive(Debug, Clone, Serialize)]
pub struct MasaMismatch {
    pub day: String,
    pub convention: MasaConvention,
    pub original: String,
    pub computed: String,
}

/// A day/category whose canonical original names were not all present in
/// the computed side. Event comparison was skipped for that day/category.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageViolation {
    pub category: Category,
    pub day: String,
    pub original_names: Vec<String>,
    pub computed_names: Vec<String>,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize)]
pub struct ComparisonResult {
    pub tithi: DiffSeries,
    pub nakshatra: DiffSeries,
    pub yoga: DiffSeries,
    pub sunrise: DiffSeries,
    pub masa_mismatches: usize,
    pub masa_diagnostics: Vec<MasaMismatch>,
    pub coverage_violations: Vec<CoverageViolation>,
}

impl ComparisonResult {
    pub fn series(&self, category: Category) -> &DiffSeries {
        match category {
            Category::Tithi => &self.tithi,
            Category::Nakshatra => &self.nakshatra,
            Category::Yoga => &self.yoga,
            Category::Sunrise => &self.sunrise,
        }
    }

    pub(crate) fn series_mut(&mut self, category: Category) -> &mut DiffSeries {
        match category {
            Category::Tithi => &mut self.tithi,
            Category::Nakshatra => &mut self.nakshatra,
            Category::Yoga => &mut self.yoga,
            Category::Sunrise => &mut self.sunrise,
        }
    }

    pub fn total_samples(&self) -> usize {
        Category::ALL.iter().map(|c| self.series(*c).count()).sum()
    }

    pub fn has_diagnostics(&self) -> bool {
        self.masa_mismatches > 0 || !self.coverage_violations.is_empty()
    }
}
