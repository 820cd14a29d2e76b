//! `panchanga fetch` — download a year of daily almanac data.
//!
//! One GET per day, keyed by the unix second of local midnight. The output
//! archive is reloaded on start so an interrupted run resumes where it
//! stopped, and progress is saved every few successful days.

use std::path::Path;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use panchanga_core::ist_midnight_epoch;

use crate::exit_codes;
use crate::CliError;

// ── Constants ───────────────────────────────────────────────────────

const USER_AGENT: &str = concat!("panchanga/", env!("CARGO_PKG_VERSION"));
const SAVE_EVERY: usize = 10;

// ── Job config ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct FetchConfig {
    pub api_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RetryConfig {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before retry n is `base_delay_ms * n`.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Pause between successful requests.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    5000
}

fn default_pacing_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

impl FetchConfig {
    pub(crate) fn from_toml(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::usage(format!("cannot read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&text).map_err(|e| {
            CliError::usage(format!("invalid config {}: {}", path.display(), e))
        })
    }

    pub(crate) fn validate(&self) -> Result<(), CliError> {
        if !self.api_url.starts_with("https://") {
            return Err(CliError {
                code: exit_codes::EXIT_USAGE,
                message: format!("api_url must use https (got {})", self.api_url),
                hint: Some("set api_url = \"https://...\" in the job config".into()),
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CliError::usage(format!(
                "latitude {} out of range [-90, 90]",
                self.latitude,
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CliError::usage(format!(
                "longitude {} out of range [-180, 180]",
                self.longitude,
            )));
        }
        if self.year < 1 {
            return Err(CliError::usage(format!("year {} is not valid", self.year)));
        }
        Ok(())
    }
}

// ── Raw archive ─────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct RawArchive {
    metadata: ArchiveMetadata,
    #[serde(default)]
    daily_data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArchiveMetadata {
    year: i32,
    latitude: f64,
    longitude: f64,
    generated_at: i64,
    last_updated: i64,
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn load_or_init_archive(path: &Path, cfg: &FetchConfig) -> RawArchive {
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(archive) => return archive,
                Err(e) => eprintln!(
                    "warning: cannot parse existing archive {}: {} (starting fresh)",
                    path.display(),
                    e,
                ),
            },
            Err(e) => eprintln!(
                "warning: cannot read existing archive {}: {} (starting fresh)",
                path.display(),
                e,
            ),
        }
    }
    RawArchive {
        metadata: ArchiveMetadata {
            year: cfg.year,
            latitude: cfg.latitude,
            longitude: cfg.longitude,
            generated_at: unix_now(),
            last_updated: unix_now(),
        },
        daily_data: serde_json::Map::new(),
    }
}

fn save_archive(archive: &mut RawArchive, path: &Path) -> Result<(), CliError> {
    archive.metadata.last_updated = unix_now();
    let rendered = serde_json::to_string_pretty(archive)
        .map_err(|e| CliError::io(format!("cannot serialize archive: {}", e)))?;
    std::fs::write(path, rendered)
        .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))
}

// ── HTTP with retry ─────────────────────────────────────────────────

/// GET with bounded retry. 401/403 and 400 fail immediately; 429, 5xx and
/// network errors retry with a linearly scaled delay. The delay goes
/// through `sleep` so tests can count waits instead of serving them.
pub(crate) fn get_with_retry(
    http: &reqwest::blocking::Client,
    url: &str,
    query: &[(&str, String)],
    retry: &RetryConfig,
    sleep: &mut dyn FnMut(Duration),
) -> Result<serde_json::Value, CliError> {
    for attempt in 0..=retry.max_retries {
        let result = http.get(url).query(query).send();

        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();

                // Auth errors: fail immediately
                if status == 401 || status == 403 {
                    return Err(CliError {
                        code: exit_codes::EXIT_FETCH_AUTH,
                        message: format!("upstream auth failed ({})", status),
                        hint: None,
                    });
                }

                // Bad request: fail immediately
                if status == 400 {
                    return Err(CliError {
                        code: exit_codes::EXIT_FETCH_VALIDATION,
                        message: format!("upstream rejected request ({})", status),
                        hint: None,
                    });
                }

                // Other 4xx (not 429): fail immediately
                if status >= 400 && status < 500 && status != 429 {
                    return Err(CliError {
                        code: exit_codes::EXIT_FETCH_UPSTREAM,
                        message: format!("upstream error ({})", status),
                        hint: None,
                    });
                }

                // Retryable: 429, 5xx
                if status == 429 || status >= 500 {
                    if attempt == retry.max_retries {
                        let code = if status == 429 {
                            exit_codes::EXIT_FETCH_RATE_LIMIT
                        } else {
                            exit_codes::EXIT_FETCH_UPSTREAM
                        };
                        return Err(CliError {
                            code,
                            message: format!(
                                "upstream {} after {} retries (HTTP {})",
                                if status == 429 { "rate limit" } else { "error" },
                                retry.max_retries,
                                status,
                            ),
                            hint: None,
                        });
                    }

                    let wait = Duration::from_millis(
                        retry.base_delay_ms * u64::from(attempt + 1),
                    );
                    eprintln!(
                        "warning: retry {}/{} in {}ms (HTTP {})",
                        attempt + 1,
                        retry.max_retries,
                        wait.as_millis(),
                        status,
                    );
                    sleep(wait);
                    continue;
                }

                // Success: read as text, then parse
                let text = resp.text().map_err(|e| CliError {
                    code: exit_codes::EXIT_FETCH_UPSTREAM,
                    message: format!("failed to read response body: {}", e),
                    hint: None,
                })?;
                let body: serde_json::Value =
                    serde_json::from_str(&text).map_err(|e| CliError {
                        code: exit_codes::EXIT_FETCH_UPSTREAM,
                        message: format!(
                            "failed to parse JSON response: {} (body: {})",
                            e,
                            body_snippet(&text),
                        ),
                        hint: None,
                    })?;

                return Ok(body);
            }
            Err(e) => {
                // Network/timeout errors: retry
                if attempt == retry.max_retries {
                    return Err(CliError {
                        code: exit_codes::EXIT_FETCH_UPSTREAM,
                        message: format!(
                            "upstream unreachable after {} retries: {}",
                            retry.max_retries, e,
                        ),
                        hint: None,
                    });
                }

                let wait = Duration::from_millis(
                    retry.base_delay_ms * u64::from(attempt + 1),
                );
                eprintln!(
                    "warning: retry {}/{} in {}ms ({})",
                    attempt + 1,
                    retry.max_retries,
                    wait.as_millis(),
                    e,
                );
                sleep(wait);
            }
        }
    }

    unreachable!()
}

// ── Command ─────────────────────────────────────────────────────────

pub(crate) fn cmd_fetch(config: &Path, output: &Path) -> Result<(), CliError> {
    let cfg = FetchConfig::from_toml(config)?;
    cfg.validate()?;

    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CliError::io(format!("cannot build HTTP client: {}", e)))?;

    let mut sleep = |d: Duration| thread::sleep(d);
    run_fetch(&cfg, output, &http, &mut sleep)
}

/// The fetch loop, with the sleeper injected so tests run without waits.
fn run_fetch(
    cfg: &FetchConfig,
    output: &Path,
    http: &reqwest::blocking::Client,
    sleep: &mut dyn FnMut(Duration),
) -> Result<(), CliError> {
    let mut archive = load_or_init_archive(output, cfg);
    let days = year_days(cfg.year);
    let total = days.len();

    let mut skipped = 0usize;
    let mut fetched = 0usize;
    let mut failed = 0usize;

    eprintln!("fetching {} days for {}...", total, cfg.year);

    for date in days {
        let timestamp = ist_midnight_epoch(date);
        let key = timestamp.to_string();

        if archive.daily_data.contains_key(&key) {
            skipped += 1;
            continue;
        }

        let query = [
            ("timestamp", key.clone()),
            ("lat", cfg.latitude.to_string()),
            ("long", cfg.longitude.to_string()),
        ];
        match get_with_retry(http, &cfg.api_url, &query, &cfg.retry, sleep) {
            Ok(body) => {
                if body["status"].as_i64() == Some(200) && body["data"].is_object() {
                    archive.daily_data.insert(key, body["data"].clone());
                    fetched += 1;
                    if fetched % SAVE_EVERY == 0 {
                        save_archive(&mut archive, output)?;
                        eprintln!(
                            "progress: {}/{} days ({} fetched, {} failed)",
                            skipped + fetched + failed,
                            total,
                            fetched,
                            failed,
                        );
                    }
                } else {
                    eprintln!("warning: {}: unexpected payload, skipping day", date);
                    failed += 1;
                }
            }
            // Auth/validation failures will repeat for every remaining day
            Err(e)
                if e.code == exit_codes::EXIT_FETCH_AUTH
                    || e.code == exit_codes::EXIT_FETCH_VALIDATION =>
            {
                save_archive(&mut archive, output)?;
                return Err(e);
            }
            Err(e) => {
                eprintln!("warning: {}: {} (skipping day)", date, e.message);
                failed += 1;
            }
        }

        sleep(Duration::from_millis(cfg.retry.pacing_ms));
    }

    save_archive(&mut archive, output)?;
    eprintln!(
        "done: {} fetched, {} already present, {} failed, archive {}",
        fetched,
        skipped,
        failed,
        output.display(),
    );

    if failed > 0 {
        eprintln!("rerun the same command to retry the {} missing days", failed);
    }
    Ok(())
}

/// Leading slice of a response body for error messages, cut on a char
/// boundary so multibyte bodies never panic the truncation.
fn body_snippet(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn year_days(year: i32) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(year, 1, 1);
    while let Some(d) = date {
        if d.year() != year {
            break;
        }
        days.push(d);
        date = d.succ_opt();
    }
    days
}

// ── Tests ───────────────────────────────────────────────────────────
