//! Half-open time ranges and their ISO-8601 wire form.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeZone, Utc,
};
use serde::{Serialize, Serializer};

use crate::error::{DruidError, DruidResult};

/// Naive layouts accepted for free-form date strings (interpreted as UTC).
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-aware layouts tried after RFC 3339.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// How an interval renders its two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalFormat {
    /// Both sides converted to UTC with millisecond precision:
    /// `2019-04-15T08:00:00.000Z`.
    #[default]
    UtcMillis,
    /// Each side in its own offset, millisecond precision:
    /// `2019-04-15T10:00:00.000+02:00`.
    NativeOffset,
}

/// One side of an interval, as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum IntervalBound {
    /// An already-resolved instant.
    Instant(DateTime<FixedOffset>),
    /// Unix epoch seconds.
    Epoch(i64),
    /// A date or date-time string; numeric strings are epoch seconds.
    Text(String),
}

impl IntervalBound {
    /// Resolve this bound to an instant.
    pub fn resolve(&self) -> DruidResult<DateTime<FixedOffset>> {
        match self {
            IntervalBound::Instant(instant) => Ok(*instant),
            IntervalBound::Epoch(seconds) => from_epoch(*seconds),
            IntervalBound::Text(text) => parse_instant(text),
        }
    }
}

impl From<DateTime<FixedOffset>> for IntervalBound {
    fn from(value: DateTime<FixedOffset>) -> Self {
        IntervalBound::Instant(value)
    }
}

impl From<DateTime<Utc>> for IntervalBound {
    fn from(value: DateTime<Utc>) -> Self {
        IntervalBound::Instant(value.fixed_offset())
    }
}

impl From<i64> for IntervalBound {
    fn from(value: i64) -> Self {
        IntervalBound::Epoch(value)
    }
}

impl From<&str> for IntervalBound {
    fn from(value: &str) -> Self {
        IntervalBound::Text(value.to_string())
    }
}

impl From<String> for IntervalBound {
    fn from(value: String) -> Self {
        IntervalBound::Text(value)
    }
}

fn from_epoch(seconds: i64) -> DruidResult<DateTime<FixedOffset>> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|instant| instant.fixed_offset())
        .ok_or_else(|| DruidError::InvalidInterval(format!("timestamp {} is out of range", seconds)))
}

/// Parse a free-form date string into an instant.
fn parse_instant(text: &str) -> DruidResult<DateTime<FixedOffset>> {
    let text = text.trim();

    if let Ok(seconds) = text.parse::<i64>() {
        return from_epoch(seconds);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant);
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(text, format) {
            return Ok(instant);
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    Err(DruidError::InvalidInterval(format!(
        "could not parse {:?} as a date",
        text
    )))
}

/// An immutable time range `[start, stop)` with `stop > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
    format: IntervalFormat,
}

impl Interval {
    /// Build an interval from two bounds.
    ///
    /// Each bound may be an instant, an epoch integer or a date string.
    /// Both are truncated to milliseconds, the precision of the wire form.
    pub fn new(start: impl Into<IntervalBound>, stop: impl Into<IntervalBound>) -> DruidResult<Self> {
        let start = start.into().resolve()?.trunc_subsecs(3);
        let stop = stop.into().resolve()?.trunc_subsecs(3);

        if stop <= start {
            return Err(DruidError::InvalidInterval(format!(
                "stop {} must be after start {}",
                stop.to_rfc3339(),
                start.to_rfc3339()
            )));
        }

        Ok(Self {
            start,
            stop,
            format: IntervalFormat::default(),
        })
    }

    /// Parse a combined `start/stop` string.
    pub fn parse(interval: &str) -> DruidResult<Self> {
        let (start, stop) = interval.split_once('/').ok_or_else(|| {
            DruidError::InvalidInterval(format!(
                "{:?}: interval must be start/stop separated by /",
                interval
            ))
        })?;
        Self::new(start, stop)
    }

    /// Render with the given format instead of the UTC default.
    pub fn with_format(mut self, format: IntervalFormat) -> Self {
        self.format = format;
        self
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn stop(&self) -> DateTime<FixedOffset> {
        self.stop
    }

    pub fn format(&self) -> IntervalFormat {
        self.format
    }

    /// The `start/stop` wire string.
    pub fn interval(&self) -> String {
        format!("{}/{}", self.render(self.start), self.render(self.stop))
    }

    fn render(&self, instant: DateTime<FixedOffset>) -> String {
        match self.format {
            IntervalFormat::UtcMillis => instant
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            IntervalFormat::NativeOffset => instant.to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}

impl FromStr for Interval {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::parse(s)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.interval())
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.interval())
    }
}
