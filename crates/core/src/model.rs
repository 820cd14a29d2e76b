use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The three sub-day event categories a day record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Tithi,
    Nakshatra,
    Yoga,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Tithi, EventKind::Nakshatra, EventKind::Yoga];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tithi => "tithi",
            Self::Nakshatra => "nakshatra",
            Self::Yoga => "yoga",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named state with its validity window. Times are formatted local
/// strings; the empty string means the instant is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

// ---------------------------------------------------------------------------
// Day record
// ---------------------------------------------------------------------------

/// The current lunar month under the two month-boundary conventions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasaLabels {
    #[serde(default)]
    pub amanta: String,
    #[serde(default)]
    pub purnima: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub masa: MasaLabels,
    #[serde(default)]
    pub sunrise: String,
    #[serde(default)]
    pub vaara: String,
    #[serde(default)]
    pub tithi: Vec<Event>,
    #[serde(default)]
    pub nakshatra: Vec<Event>,
    #[serde(default)]
    pub yoga: Vec<Event>,
}

impl DayRecord {
    pub fn events(&self, kind: EventKind) -> &[Event] {
        match kind {
            EventKind::Tithi => &self.tithi,
            EventKind::Nakshatra => &self.nakshatra,
            EventKind::Yoga => &self.yoga,
        }
    }
}

// ---------------------------------------------------------------------------
// Yearly dataset
// ---------------------------------------------------------------------------

/// A year of day records keyed by formatted local-midnight strings.
///
/// Day keys iterate in file order, so two runs over the same input visit
/// days — and emit diagnostics — in the same order.
#[derive(Debug, Default, Deserialize)]
pub struct YearlyDataset {
    #[serde(default)]
    pub daily_data: DayMap,
}

impl YearlyDataset {
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, &DayRecord)> {
        self.daily_data.iter()
    }

    pub fn get(&self, key: &str) -> Option<&DayRecord> {
        self.daily_data.get(key)
    }

    pub fn len(&self) -> usize {
        self.daily_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_data.is_empty()
    }
}

/// Insertion-ordered day map. A `HashMap` would scramble iteration order
/// and a `BTreeMap` would re-sort it; day counts are small enough that
/// linear key lookup is fine.
#[derive(Debug, Default)]
pub struct DayMap(Vec<(String, DayRecord)>);

impl DayMap {
    pub fn insert(&mut self, key: impl Into<String>, record: DayRecord) {
        self.0.push((key.into(), record));
    }

    pub fn get(&self, key: &str) -> Option<&DayRecord> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for DayMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DayMapVisitor;

        impl<'de> Visitor<'de> for DayMapVisitor {
            type Value = DayMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of day keys to day records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<DayMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, record)) = access.next_entry::<String, DayRecord>()? {
                    entries.push((key, record));
                }
                Ok(DayMap(entries))
            }
        }

        deserializer.deserialize_map(DayMapVisitor)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
