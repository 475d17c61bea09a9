//! Camera acquisition metadata.
//!
//! The metadata file that accompanies a stack is plain text: one
//! `key = value`, `key=value` or `key: value` pair per line, `#` comments
//! and blank lines ignored. Keys are matched case-insensitively with
//! whitespace collapsed and any trailing unit in parentheses dropped, so
//! `Kinetic Cycle Time (secs)` and `kinetic  cycle time` are the same key.
//!
//! Every `Time`, `Timestamp` or `Time Stamp` entry is the timestamp of the
//! next frame, in file order. Values may be plain seconds (`0.125`,
//! `0.125s`), clock times (`10:41:07.250`) or full date-times
//! (`2019-03-12 10:41:07.250`). Clock and date-time values are converted to
//! seconds since the first entry; a clock that wraps past midnight adds a
//! day.
//!
//! A metadata file with a `.json` extension is read as a plain array of
//! seconds instead.

use std::path::Path;

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::error::StackError;
use crate::timestamps::{FixedInterval, TimestampSequence, TimestampSource};

const SECS_PER_DAY: f64 = 86_400.0;

const TIME_KEYS: [&str; 3] = ["time", "timestamp", "time stamp"];
const CYCLE_TIME_KEYS: [&str; 2] = ["kinetic cycle time", "cycle time"];

/// Parsed acquisition metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionMetadata {
    /// Non-timestamp entries, normalized key first, in file order.
    entries: Vec<(String, String)>,

    /// Per-frame timestamps in seconds.
    frame_times: Vec<f64>,

    /// Constant frame interval, if the file declares one.
    cycle_time_secs: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
enum RawTime {
    Seconds(f64),
    Clock(NaiveTime),
    Stamp(NaiveDateTime),
}

impl AcquisitionMetadata {
    /// Load metadata from disk, choosing the JSON or text reader by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StackError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| StackError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let metadata = if is_json {
            let times: Vec<f64> =
                serde_json::from_str(&content).map_err(|e| StackError::ParseError {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            Self::from_frame_times(times)
        } else {
            Self::parse(&content).map_err(|e| match e {
                StackError::MetadataError { message } => {
                    StackError::metadata(format!("{}: {message}", path.display()))
                }
                other => other,
            })?
        };

        tracing::debug!(
            path = %path.display(),
            frame_times = metadata.frame_times.len(),
            cycle_time_secs = ?metadata.cycle_time_secs,
            "Loaded acquisition metadata"
        );
        Ok(metadata)
    }

    /// Metadata that carries only per-frame timestamps.
    pub fn from_frame_times(frame_times: Vec<f64>) -> Self {
        Self {
            frame_times,
            ..Self::default()
        }
    }

    /// Parse the text metadata format.
    pub fn parse(text: &str) -> Result<Self, StackError> {
        let mut metadata = Self::default();
        let mut raw_times = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = split_entry(line) else {
                continue;
            };
            let key = normalize_key(key);
            let value = value.trim();

            if TIME_KEYS.contains(&key.as_str()) {
                let time = parse_time(value).ok_or_else(|| {
                    StackError::metadata(format!(
                        "line {}: unrecognized timestamp '{value}'",
                        line_no + 1
                    ))
                })?;
                raw_times.push(time);
            } else if CYCLE_TIME_KEYS.contains(&key.as_str()) {
                let secs = parse_seconds(value).ok_or_else(|| {
                    StackError::metadata(format!(
                        "line {}: unrecognized cycle time '{value}'",
                        line_no + 1
                    ))
                })?;
                metadata.cycle_time_secs = Some(secs);
            } else {
                metadata.entries.push((key, value.to_string()));
            }
        }

        metadata.frame_times = resolve_times(&raw_times)?;
        Ok(metadata)
    }

    /// Look up a non-timestamp entry by key (matched like the file's keys).
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Per-frame timestamps found in the file.
    pub fn frame_times(&self) -> &[f64] {
        &self.frame_times
    }

    /// Constant frame interval declared in the file.
    pub fn cycle_time_secs(&self) -> Option<f64> {
        self.cycle_time_secs
    }

    /// Number of non-timestamp entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl TimestampSource for AcquisitionMetadata {
    fn timestamps(&self, frame_count: usize) -> Result<TimestampSequence, StackError> {
        if !self.frame_times.is_empty() {
            if self.frame_times.len() < frame_count {
                return Err(StackError::metadata(format!(
                    "metadata lists {} timestamps but the stack has {frame_count} frames",
                    self.frame_times.len()
                )));
            }
            if self.frame_times.len() > frame_count {
                tracing::warn!(
                    timestamps = self.frame_times.len(),
                    frames = frame_count,
                    "Metadata lists more timestamps than frames; ignoring the extra entries"
                );
            }
            return TimestampSequence::new(self.frame_times[..frame_count].to_vec());
        }

        match self.cycle_time_secs {
            Some(interval) => FixedInterval::new(interval).timestamps(frame_count),
            None => Err(StackError::metadata(
                "metadata has neither per-frame timestamps nor a cycle time",
            )),
        }
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = match line.split_once('=') {
        Some(pair) => pair,
        None => line.split_once(':')?,
    };
    if key.trim().is_empty() {
        return None;
    }
    Some((key, value))
}

fn normalize_key(key: &str) -> String {
    let mut key = key.trim();
    if key.ends_with(')') {
        if let Some(open) = key.rfind('(') {
            key = key[..open].trim_end();
        }
    }
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_seconds(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = ["secs", "sec", "s"]
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
        .unwrap_or(value)
        .trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_time(value: &str) -> Option<RawTime> {
    if let Some(secs) = parse_seconds(value) {
        return Some(RawTime::Seconds(secs));
    }
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S%.f") {
        return Some(RawTime::Clock(time));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%d/%m/%Y %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(RawTime::Stamp)
}

/// Convert raw entries to seconds. All entries must use the same form.
fn resolve_times(raw: &[RawTime]) -> Result<Vec<f64>, StackError> {
    let Some(first) = raw.first() else {
        return Ok(Vec::new());
    };

    let mixed = || StackError::metadata("timestamps mix seconds, clock times and date-times");

    match *first {
        RawTime::Seconds(_) => raw
            .iter()
            .map(|t| match t {
                RawTime::Seconds(s) => Ok(*s),
                _ => Err(mixed()),
            })
            .collect(),
        RawTime::Clock(start) => {
            let start = clock_secs(start);
            let mut day_offset = 0.0;
            let mut previous = start;
            raw.iter()
                .map(|t| match t {
                    RawTime::Clock(time) => {
                        let secs = clock_secs(*time);
                        if secs < previous {
                            day_offset += SECS_PER_DAY;
                        }
                        previous = secs;
                        Ok(secs + day_offset - start)
                    }
                    _ => Err(mixed()),
                })
                .collect()
        }
        RawTime::Stamp(start) => raw
            .iter()
            .map(|t| match t {
                RawTime::Stamp(stamp) => {
                    let delta = *stamp - start;
                    Ok(delta.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0)
                }
                _ => Err(mixed()),
            })
            .collect(),
    }
}

fn clock_secs(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1_000_000_000.0
}
