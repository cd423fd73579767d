//! TimeOfDay - 12 時間表記の時刻
//!
//! Editor input arrives as `"HH:MM AM"` / `"HH:MM PM"`. Internally the value
//! is a 24-hour `(hour, minute)` pair in `[0,23] x [0,59]`.
//!
//! # Invariant
//! Parsing never yields a `TimeOfDay` for malformed input. Callers decide
//! what to do with the error (the schedule drops the entry).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Defaults to midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("malformed time '{0}', expected HH:MM AM|PM")]
    Malformed(String),

    #[error("hour {0} out of range 1-12")]
    HourOutOfRange(u32),

    #[error("minute {0} out of range 0-59")]
    MinuteOutOfRange(u32),

    #[error("missing AM/PM in '{0}'")]
    MissingMeridiem(String),

    #[error("unknown meridiem '{0}'")]
    UnknownMeridiem(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl TimeOfDay {
    /// Build from a 24-hour pair. Returns `None` when out of range.
    pub fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    /// Parse `"H:MM AM"` style input (meridiem is case-insensitive and may
    /// be glued to the digits, e.g. `"9:05pm"`).
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let trimmed = input.trim();
        let (clock, meridiem) = split_meridiem(trimmed)?;

        let (h, m) = clock
            .split_once(':')
            .ok_or_else(|| TimeParseError::Malformed(input.to_string()))?;
        let hour = parse_component(h).ok_or_else(|| TimeParseError::Malformed(input.to_string()))?;
        let minute =
            parse_component(m).ok_or_else(|| TimeParseError::Malformed(input.to_string()))?;

        if !(1..=12).contains(&hour) {
            return Err(TimeParseError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minute));
        }

        let hour = match (meridiem, hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Am, h) => h,
            (Meridiem::Pm, 12) => 12,
            (Meridiem::Pm, h) => h + 12,
        };

        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Hour in 24-hour form.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // hour/minute are range-checked on construction
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

fn split_meridiem(s: &str) -> Result<(&str, Meridiem), TimeParseError> {
    let split_at = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map(|(i, _)| i);

    let Some(idx) = split_at else {
        return Err(TimeParseError::MissingMeridiem(s.to_string()));
    };

    let (clock, suffix) = s.split_at(idx);
    let meridiem = match suffix.to_ascii_lowercase().as_str() {
        "am" => Meridiem::Am,
        "pm" => Meridiem::Pm,
        _ => return Err(TimeParseError::UnknownMeridiem(suffix.to_string())),
    };
    Ok((clock.trim_end(), meridiem))
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    /// Renders back in the editor's format, e.g. `"09:00 AM"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour12, meridiem) = match self.hour {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{hour12:02}:{:02} {meridiem}", self.minute)
    }
}
