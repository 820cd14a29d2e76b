//! `panchanga clean` — raw archive to clean comparison shape.
//!
//! Re-keys days from unix seconds to the formatted local midnight string,
//! renders all instants in fixed IST, and prefixes tithi names with the
//! day's paksha. Day order is preserved.

use std::path::Path;

use serde::Deserialize;

use panchanga_core::{format_ist, DayRecord, Event, MasaLabels};

use crate::CliError;

// ── Raw payload shapes ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawArchive {
    #[serde(default)]
    daily_data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDay {
    #[serde(default)]
    paksha: String,
    #[serde(default)]
    tithi: Vec<RawInterval>,
    #[serde(default)]
    nakshatra: Vec<RawInterval>,
    #[serde(default)]
    yoga: Vec<RawInterval>,
    #[serde(default)]
    vaara: RawNamed,
    #[serde(default)]
    sun: RawSun,
    #[serde(default)]
    masa: RawMasa,
}

#[derive(Debug, Default, Deserialize)]
struct RawInterval {
    #[serde(default)]
    name: String,
    start_time: Option<i64>,
    end_time: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNamed {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawSun {
    rise: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMasa {
    #[serde(default)]
    amanta: String,
    #[serde(default)]
    purnima: String,
}

// ── Transformation ──────────────────────────────────────────────────

fn clean_archive(
    raw: &serde_json::Map<String, serde_json::Value>,
) -> Result<serde_json::Map<String, serde_json::Value>, CliError> {
    let mut out = serde_json::Map::new();
    for (key, value) in raw {
        let secs: i64 = key.parse().map_err(|_| {
            CliError::io(format!("day key '{}' is not a unix timestamp", key))
        })?;
        let day: RawDay = serde_json::from_value(value.clone()).map_err(|e| {
            CliError::io(format!("day '{}': malformed payload: {}", key, e))
        })?;
        let record = clean_day(&day);
        let rendered = serde_json::to_value(&record)
            .map_err(|e| CliError::io(format!("day '{}': {}", key, e)))?;
        out.insert(format_ist(secs), rendered);
    }
    Ok(out)
}

fn clean_day(raw: &RawDay) -> DayRecord {
    let prefix = tithi_prefix(&raw.paksha);
    DayRecord {
        masa: MasaLabels {
            amanta: raw.masa.amanta.clone(),
            purnima: raw.masa.purnima.clone(),
        },
        sunrise: format_instant(raw.sun.rise),
        vaara: raw.vaara.name.clone(),
        tithi: raw
            .tithi
            .iter()
            .map(|t| Event {
                name: format!("{}{}", prefix, t.name),
                start_time: format_instant(t.start_time),
                end_time: format_instant(t.end_time),
            })
            .collect(),
        nakshatra: raw.nakshatra.iter().map(clean_event).collect(),
        yoga: raw.yoga.iter().map(clean_event).collect(),
    }
}

fn clean_event(raw: &RawInterval) -> Event {
    Event {
        name: raw.name.clone(),
        start_time: format_instant(raw.start_time),
        end_time: format_instant(raw.end_time),
    }
}

/// Only tithi names carry the paksha. Nakshatra and yoga names are global.
fn tithi_prefix(paksha: &str) -> &'static str {
    if paksha.is_empty() {
        ""
    } else if paksha == "Krishna Paksha" {
        "Krishna "
    } else {
        "Shukla "
    }
}

/// Zero is the upstream's other spelling of "absent".
fn format_instant(secs: Option<i64>) -> String {
    match secs {
        Some(s) if s != 0 => format_ist(s),
        _ => String::new(),
    }
}

// ── Command ─────────────────────────────────────────────────────────

pub(crate) fn cmd_clean(input: &Path, output: &Path) -> Result<(), CliError> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| CliError::usage(format!("cannot read {}: {}", input.display(), e)))?;
    let raw: RawArchive = serde_json::from_str(&text)
        .map_err(|e| CliError::io(format!("cannot parse {}: {}", input.display(), e)))?;

    let cleaned = clean_archive(&raw.daily_data)?;
    let count = cleaned.len();
    let doc = serde_json::json!({ "daily_data": cleaned });
    let rendered = serde_json::to_string_pretty(&doc)
        .map_err(|e| CliError::io(format!("cannot serialize clean dataset: {}", e)))?;
    std::fs::write(output, rendered)
        .map_err(|e| CliError::io(format!("cannot write {}: {}", output.display(), e)))?;

    eprintln!("cleaned {} days -> {}", count, output.display());
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-01 12:00 AM IST
    const NEW_YEAR_MIDNIGHT: i64 = 1735669800;

    fn raw_day(json: serde_json::Value) -> RawDay {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn rekeys_unix_seconds_to_local_midnight() {
        let mut raw = serde_json::Map::new();
        raw.insert(NEW_YEAR_MIDNIGHT.to_string(), serde_json::json!({}));
        let cleaned = clean_archive(&raw).unwrap();
        assert!(cleaned.contains_key("2025-01-01 12:00 AM"));
        assert_eq!(cleaned.len(), 1);
    }

    #[test]
    fn non_numeric_day_key_is_an_error() {
        let mut raw = serde_json::Map::new();
        raw.insert("2025-01-01".into(), serde_json::json!({}));
        let err = clean_archive(&raw).unwrap_err();
        assert!(err.message.contains("not a unix timestamp"));
    }

    #[test]
    fn paksha_prefixes_tithi_names_only() {
        let day = raw_day(serde_json::json!({
            "paksha": "Krishna Paksha",
            "tithi": [{ "name": "Chaturthi", "start_time": NEW_YEAR_MIDNIGHT }],
            "nakshatra": [{ "name": "Rohini", "start_time": NEW_YEAR_MIDNIGHT }]
        }));
        let record = clean_day(&day);
        assert_eq!(record.tithi[0].name, "Krishna Chaturthi");
        assert_eq!(record.nakshatra[0].name, "Rohini");

        let day = raw_day(serde_json::json!({
            "paksha": "Shukla Paksha",
            "tithi": [{ "name": "Purnima" }]
        }));
        assert_eq!(clean_day(&day).tithi[0].name, "Shukla Purnima");

        let day = raw_day(serde_json::json!({
            "tithi": [{ "name": "Pratipada" }]
        }));
        assert_eq!(clean_day(&day).tithi[0].name, "Pratipada");
    }

    #[test]
    fn instants_render_in_fixed_local_time() {
        let day = raw_day(serde_json::json!({
            "sun": { "rise": NEW_YEAR_MIDNIGHT + 6 * 3600 + 42 * 60 },
            "tithi": [{ "name": "Pratipada", "start_time": NEW_YEAR_MIDNIGHT }]
        }));
        let record = clean_day(&day);
        assert_eq!(record.sunrise, "2025-01-01 06:42 AM");
        assert_eq!(record.tithi[0].start_time, "2025-01-01 12:00 AM");
        assert_eq!(record.tithi[0].end_time, "");
    }

    #[test]
    fn zero_and_missing_instants_are_empty() {
        let day = raw_day(serde_json::json!({
            "sun": { "rise": 0 },
            "tithi": [{ "name": "Pratipada" }]
        }));
        let record = clean_day(&day);
        assert_eq!(record.sunrise, "");
        assert_eq!(record.tithi[0].start_time, "");
    }

    #[test]
    fn masa_and_vaara_carry_through() {
        let day = raw_day(serde_json::json!({
            "masa": { "amanta": "Margashirsha", "purnima": "Pausha" },
            "vaara": { "name": "Budhavara" }
        }));
        let record = clean_day(&day);
        assert_eq!(record.masa.amanta, "Margashirsha");
        assert_eq!(record.masa.purnima, "Pausha");
        assert_eq!(record.vaara, "Budhavara");
    }

    #[test]
    fn cmd_clean_writes_loadable_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.json");
        let output = dir.path().join("clean.json");

        let raw = serde_json::json!({
            "metadata": { "year": 2025 },
            "daily_data": {
                NEW_YEAR_MIDNIGHT.to_string(): {
                    "paksha": "Shukla Paksha",
                    "tithi": [{
                        "name": "Dwitiya",
                        "start_time": NEW_YEAR_MIDNIGHT - 3600,
                        "end_time": NEW_YEAR_MIDNIGHT + 82800
                    }],
                    "sun": { "rise": NEW_YEAR_MIDNIGHT + 24120 },
                    "masa": { "amanta": "Pausha", "purnima": "Pausha" }
                }
            }
        });
        std::fs::write(&input, serde_json::to_string(&raw).unwrap()).unwrap();

        cmd_clean(&input, &output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let dataset = panchanga_core::YearlyDataset::from_json_str(&text).unwrap();
        let day = dataset.get("2025-01-01 12:00 AM").unwrap();
        assert_eq!(day.tithi[0].name, "Shukla Dwitiya");
        assert_eq!(day.tithi[0].start_time, "2024-12-31 11:00 PM");
        assert_eq!(day.sunrise, "2025-01-01 06:42 AM");
    }
}
