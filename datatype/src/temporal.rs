//! Date and time codecs.
//!
//! Every temporal value is a UTC timestamp in milliseconds. Partial forms
//! fill in the missing fields: `gYear` is January 1st, `time` is on
//! 1970-01-01, and forms without a year (`gMonth`, `gMonthDay`, `gDay`) are
//! anchored in 1972 so that `--02-29` is representable.

use crate::codec::{lexical_captures, lexical_match, DatatypeCodec, ValueKind};
use crate::error::{CodecError, CodecResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use ontic_core::Value;
use regex_lite::Regex;
use std::sync::OnceLock;

const ANCHOR_YEAR: i32 = 1972;

/// The lexical shape of a temporal datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalForm {
    /// `2008-01-15`
    Date,
    /// `2008-01-15T10:20:30.000Z`, any offset accepted on input
    DateTime,
    /// `10:20:30` or `10:20:30.250`
    Time,
    /// `2008`
    GYear,
    /// `2008-01`
    GYearMonth,
    /// `--01`
    GMonth,
    /// `--01-15`
    GMonthDay,
    /// `---15`
    GDay,
}

impl TemporalForm {
    pub const ALL: [TemporalForm; 8] = [
        TemporalForm::Date,
        TemporalForm::DateTime,
        TemporalForm::Time,
        TemporalForm::GYear,
        TemporalForm::GYearMonth,
        TemporalForm::GMonth,
        TemporalForm::GMonthDay,
        TemporalForm::GDay,
    ];

    /// XSD local name.
    pub fn name(self) -> &'static str {
        match self {
            TemporalForm::Date => "date",
            TemporalForm::DateTime => "dateTime",
            TemporalForm::Time => "time",
            TemporalForm::GYear => "gYear",
            TemporalForm::GYearMonth => "gYearMonth",
            TemporalForm::GMonth => "gMonth",
            TemporalForm::GMonthDay => "gMonthDay",
            TemporalForm::GDay => "gDay",
        }
    }

    fn output_format(self, millis: i64) -> &'static str {
        match self {
            TemporalForm::Date => "%Y-%m-%d",
            TemporalForm::DateTime => "%Y-%m-%dT%H:%M:%S%.3fZ",
            TemporalForm::Time if millis.rem_euclid(1000) == 0 => "%H:%M:%S",
            TemporalForm::Time => "%H:%M:%S%.3f",
            TemporalForm::GYear => "%Y",
            TemporalForm::GYearMonth => "%Y-%m",
            TemporalForm::GMonth => "--%m",
            TemporalForm::GMonthDay => "--%m-%d",
            TemporalForm::GDay => "---%d",
        }
    }
}

/// Codec for one [`TemporalForm`].
#[derive(Debug, Clone, Copy)]
pub struct TemporalCodec {
    form: TemporalForm,
}

impl TemporalCodec {
    pub fn new(form: TemporalForm) -> Self {
        Self { form }
    }

    pub fn form(&self) -> TemporalForm {
        self.form
    }

    fn invalid(&self, text: &str, reason: impl Into<String>) -> CodecError {
        CodecError::invalid_literal(self.form.name(), text, reason)
    }

    fn date_millis(&self, text: &str, y: i32, m: u32, d: u32) -> CodecResult<i64> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
            .ok_or_else(|| self.invalid(text, "no such calendar date"))
    }

    fn parse_millis(&self, text: &str) -> CodecResult<i64> {
        static TIME: OnceLock<Option<Regex>> = OnceLock::new();
        static G_YEAR: OnceLock<Option<Regex>> = OnceLock::new();
        static G_YEAR_MONTH: OnceLock<Option<Regex>> = OnceLock::new();
        static G_MONTH: OnceLock<Option<Regex>> = OnceLock::new();
        static G_MONTH_DAY: OnceLock<Option<Regex>> = OnceLock::new();
        static G_DAY: OnceLock<Option<Regex>> = OnceLock::new();

        let field = |s: Option<&str>| -> CodecResult<i64> {
            s.and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| self.invalid(text, "malformed field"))
        };
        let shape = || self.invalid(text, format!("expected {} lexical form", self.form.name()));

        match self.form {
            TemporalForm::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|e| self.invalid(text, e.to_string()))?
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
                .ok_or_else(|| self.invalid(text, "no such calendar date")),
            TemporalForm::DateTime => {
                let src = text.strip_prefix('+').unwrap_or(text);
                if let Ok(dt) = DateTime::parse_from_rfc3339(src) {
                    return Ok(dt.timestamp_millis());
                }
                NaiveDateTime::parse_from_str(src, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|dt| dt.and_utc().timestamp_millis())
                    .map_err(|e| self.invalid(text, e.to_string()))
            }
            TemporalForm::Time => {
                if !lexical_match(&TIME, r"^[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{1,3})?$", text) {
                    return Err(shape());
                }
                let time = NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
                    .map_err(|e| self.invalid(text, e.to_string()))?;
                Ok(time.num_seconds_from_midnight() as i64 * 1000
                    + (time.nanosecond() / 1_000_000) as i64)
            }
            TemporalForm::GYear => {
                let caps =
                    lexical_captures(&G_YEAR, r"^(-?[0-9]{4})$", text).ok_or_else(shape)?;
                self.date_millis(text, field(caps[0])? as i32, 1, 1)
            }
            TemporalForm::GYearMonth => {
                let caps = lexical_captures(&G_YEAR_MONTH, r"^(-?[0-9]{4})-([0-9]{2})$", text)
                    .ok_or_else(shape)?;
                self.date_millis(text, field(caps[0])? as i32, field(caps[1])? as u32, 1)
            }
            TemporalForm::GMonth => {
                let caps =
                    lexical_captures(&G_MONTH, r"^--([0-9]{2})$", text).ok_or_else(shape)?;
                self.date_millis(text, ANCHOR_YEAR, field(caps[0])? as u32, 1)
            }
            TemporalForm::GMonthDay => {
                let caps = lexical_captures(&G_MONTH_DAY, r"^--([0-9]{2})-([0-9]{2})$", text)
                    .ok_or_else(shape)?;
                self.date_millis(
                    text,
                    ANCHOR_YEAR,
                    field(caps[0])? as u32,
                    field(caps[1])? as u32,
                )
            }
            TemporalForm::GDay => {
                let caps = lexical_captures(&G_DAY, r"^---([0-9]{2})$", text).ok_or_else(shape)?;
                self.date_millis(text, ANCHOR_YEAR, 1, field(caps[0])? as u32)
            }
        }
    }
}

impl DatatypeCodec for TemporalCodec {
    fn name(&self) -> &str {
        self.form.name()
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Timestamp
    }

    fn parse(&self, text: &str) -> CodecResult<Value> {
        self.parse_millis(text.trim()).map(Value::Timestamp)
    }

    fn format(&self, value: &Value) -> CodecResult<String> {
        let millis = match value {
            Value::Timestamp(ms) => *ms,
            other => {
                return Err(CodecError::unsupported_value(
                    self.form.name(),
                    other.type_name(),
                ))
            }
        };
        let dt = DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| CodecError::unsupported_value(self.form.name(), "out-of-range Timestamp"))?;
        Ok(dt.format(self.form.output_format(millis)).to_string())
    }
}
