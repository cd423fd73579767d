//! Schedule - 週次リマインダーの設定
//!
//! A schedule maps each weekday to at most one time of day. It may be empty,
//! in which case the task never becomes due.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::time_of_day::{TimeOfDay, TimeParseError};
use super::weekday::Weekday;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    entries: BTreeMap<Weekday, TimeOfDay>,
}

/// A schedule entry that was dropped while parsing editor input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleWarning {
    pub weekday: Weekday,
    pub input: String,
    pub error: TimeParseError,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A second time for the same weekday replaces the first.
    pub fn with(mut self, weekday: Weekday, time: TimeOfDay) -> Self {
        self.entries.insert(weekday, time);
        self
    }

    /// Build a schedule from raw `(weekday, "HH:MM AM")` pairs.
    ///
    /// Malformed entries are dropped and reported back (and logged at `warn`);
    /// the remaining entries are kept. When a weekday appears twice the last
    /// valid entry wins.
    pub fn parse_entries<'a, I>(raw: I) -> (Self, Vec<ScheduleWarning>)
    where
        I: IntoIterator<Item = (Weekday, &'a str)>,
    {
        let mut schedule = Self::new();
        let mut warnings = Vec::new();

        for (weekday, input) in raw {
            match TimeOfDay::parse(input) {
                Ok(time) => {
                    schedule.entries.insert(weekday, time);
                }
                Err(error) => {
                    warn!(%weekday, input, %error, "dropping malformed schedule entry");
                    warnings.push(ScheduleWarning {
                        weekday,
                        input: input.to_string(),
                        error,
                    });
                }
            }
        }

        (schedule, warnings)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn time_on(&self, weekday: Weekday) -> Option<TimeOfDay> {
        self.entries.get(&weekday).copied()
    }

    /// Entries in weekday order (Monday first).
    pub fn entries(&self) -> impl Iterator<Item = (Weekday, TimeOfDay)> + '_ {
        self.entries.iter().map(|(day, time)| (*day, *time))
    }

    /// One-line summary, e.g. `"Mon: 09:00 AM, Fri: 05:30 PM"`.
    pub fn summary(&self) -> String {
        self.entries()
            .map(|(day, time)| format!("{}: {time}", day.short_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
