use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use panchanga_core::{canonical_name, parse_local, DayRecord, Event, EventKind, YearlyDataset};

use crate::error::ReconError;
use crate::model::{
    Category, ComparisonResult, CoverageViolation, DiffRecord, MasaConvention, MasaMismatch,
    TimeField,
};

/// Compare an original yearly dataset against an independently computed one.
///
/// Days present in only one dataset are skipped. Lunar-month disagreements
/// and name-coverage violations degrade to diagnostics and processing
/// continues; only an unparseable day key or timestamp aborts the run.
/// Iteration follows the original dataset's file order, so the result is
/// deterministic for a fixed input.
pub fn reconcile(
    original: &YearlyDataset,
    computed: &YearlyDataset,
) -> Result<ComparisonResult, ReconError> {
    let mut result = ComparisonResult::default();

    for (day_key, orig_day) in original.days() {
        let Some(comp_day) = computed.get(day_key) else {
            continue;
        };
        let day_start = parse_local(day_key).map_err(|_| ReconError::DayKeyParse {
            key: day_key.to_string(),
        })?;

        let mismatches = compare_masa(day_key, orig_day, comp_day);
        result.masa_mismatches += mismatches.len();
        result.masa_diagnostics.extend(mismatches);

        if let Some(record) = compare_sunrise(day_key, day_start.date(), orig_day, comp_day)? {
            result.sunrise.push(record);
        }

        for kind in EventKind::ALL {
            let outcome = compare_events(
                kind,
                day_key,
                day_start,
                orig_day.events(kind),
                comp_day.events(kind),
            )?;
            match outcome {
                CategoryOutcome::Compared(records) => {
                    let series = result.series_mut(kind.into());
                    for record in records {
                        series.push(record);
                    }
                }
                CategoryOutcome::Uncovered(violation) => {
                    result.coverage_violations.push(violation);
                }
            }
        }
    }

    Ok(result)
}

/// Per-day lunar-month check under both month-boundary conventions.
fn compare_masa(day_key: &str, original: &DayRecord, computed: &DayRecord) -> Vec<MasaMismatch> {
    let conventions = [
        (MasaConvention::Amanta, &original.masa.amanta, &computed.masa.amanta),
        (MasaConvention::Purnima, &original.masa.purnima, &computed.masa.purnima),
    ];

    conventions
        .into_iter()
        .filter(|(_, orig, comp)| orig != comp)
        .map(|(convention, orig, comp)| MasaMismatch {
            day: day_key.to_string(),
            convention,
            original: orig.clone(),
            computed: comp.clone(),
        })
        .collect()
}

/// Sunrise difference for one day. An absent value on either side yields no
/// sample — never a fabricated zero. A present but malformed value is fatal.
fn compare_sunrise(
    day_key: &str,
    day: NaiveDate,
    original: &DayRecord,
    computed: &DayRecord,
) -> Result<Option<DiffRecord>, ReconError> {
    if original.sunrise.is_empty() || computed.sunrise.is_empty() {
        return Ok(None);
    }
    let orig = parse_instant(day_key, "sunrise", &original.sunrise)?;
    let comp = parse_instant(day_key, "sunrise", &computed.sunrise)?;
    Ok(Some(DiffRecord {
        day,
        name: None,
        field: TimeField::Sunrise,
        original: original.sunrise.clone(),
        computed: computed.sunrise.clone(),
        minutes: panchanga_core::diff_minutes(orig, comp),
    }))
}

enum CategoryOutcome {
    Compared(Vec<DiffRecord>),
    Uncovered(CoverageViolation),
}

/// One day/category reconciliation step.
///
/// Original events are filtered to those starting before the next local
/// midnight, sorted by start, then name-checked against the computed side:
/// an event is covered when the computed list contains its raw or canonical
/// name. If any event is uncovered the whole day/category is skipped with a
/// diagnostic; otherwise every covered pairing contributes a start and an
/// end sample.
fn compare_events(
    kind: EventKind,
    day_key: &str,
    day_start: NaiveDateTime,
    original: &[Event],
    computed: &[Event],
) -> Result<CategoryOutcome, ReconError> {
    let boundary = day_start + Duration::hours(24);
    let day = day_start.date();

    // Events starting on or after the next midnight belong to the following
    // day's record. An event without a start cannot be placed at all.
    let mut filtered: Vec<(NaiveDateTime, &Event)> = Vec::new();
    for event in original {
        if event.start_time.is_empty() {
            continue;
        }
        let start = parse_instant(day_key, &format!("{kind} start_time"), &event.start_time)?;
        if start < boundary {
            filtered.push((start, event));
        }
    }
    // Stable sort: ties keep file order.
    filtered.sort_by_key(|&(start, _)| start);

    let computed_names: HashSet<&str> = computed.iter().map(|e| e.name.as_str()).collect();
    let uncovered = filtered.iter().any(|(_, event)| {
        !computed_names.contains(event.name.as_str())
            && !computed_names.contains(canonical_name(&event.name))
    });
    if uncovered {
        return Ok(CategoryOutcome::Uncovered(CoverageViolation {
            category: Category::from(kind),
            day: day_key.to_string(),
            original_names: filtered
                .iter()
                .map(|(_, e)| canonical_name(&e.name).to_string())
                .collect(),
            computed_names: computed.iter().map(|e| e.name.clone()).collect(),
        }));
    }

    let mut records = Vec::new();
    for (orig_start, event) in &filtered {
        let canonical = canonical_name(&event.name);
        let matches = computed
            .iter()
            .filter(|c| c.name == event.name || c.name == canonical);

        for candidate in matches {
            if !candidate.start_time.is_empty() {
                let comp_start = parse_instant(
                    day_key,
                    &format!("{kind} start_time"),
                    &candidate.start_time,
                )?;
                records.push(DiffRecord {
                    day,
                    name: Some(event.name.clone()),
                    field: TimeField::StartTime,
                    original: event.start_time.clone(),
                    computed: candidate.start_time.clone(),
                    minutes: panchanga_core::diff_minutes(*orig_start, comp_start),
                });
            }
            if !event.end_time.is_empty() && !candidate.end_time.is_empty() {
                let orig_end =
                    parse_instant(day_key, &format!("{kind} end_time"), &event.end_time)?;
                let comp_end =
                    parse_instant(day_key, &format!("{kind} end_time"), &candidate.end_time)?;
                records.push(DiffRecord {
                    day,
                    name: Some(event.name.clone()),
                    field: TimeField::EndTime,
                    original: event.end_time.clone(),
                    computed: candidate.end_time.clone(),
                    minutes: panchanga_core::diff_minutes(orig_end, comp_end),
                });
            }
        }
    }
    Ok(CategoryOutcome::Compared(records))
}

fn parse_instant(day_key: &str, label: &str, value: &str) -> Result<NaiveDateTime, ReconError> {
    parse_local(value).map_err(|_| ReconError::TimestampParse {
        day: day_key.to_string(),
        label: label.to_string(),
        value: value.to_string(),
    })
}
