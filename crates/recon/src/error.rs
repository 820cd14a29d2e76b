use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// A day key is not a valid local timestamp.
    DayKeyParse { key: String },
    /// A sunrise or event instant is not a valid local timestamp.
    TimestampParse { day: String, label: String, value: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DayKeyParse { key } => {
                write!(f, "cannot parse day key '{key}' as a local timestamp")
            }
            Self::TimestampParse { day, label, value } => {
                write!(f, "day '{day}': cannot parse {label} '{value}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
