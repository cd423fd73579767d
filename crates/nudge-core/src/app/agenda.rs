//! Agenda - カレンダー表示用のデータ
//!
//! Which tasks fall on a calendar date, by weekday. Delivery state is not
//! considered: the calendar shows the schedule, not what is pending.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{ReminderTask, TaskId, TimeOfDay, Weekday};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    pub task_id: TaskId,
    pub title: String,
    pub time: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub entries: Vec<AgendaEntry>,
}

/// Entries for `date`, ordered by time, ties in task order.
pub fn agenda_on(tasks: &[ReminderTask], date: NaiveDate) -> Vec<AgendaEntry> {
    let weekday = Weekday::from_chrono(date.weekday());
    let mut entries: Vec<AgendaEntry> = tasks
        .iter()
        .filter_map(|task| {
            task.schedule().time_on(weekday).map(|time| AgendaEntry {
                task_id: task.id(),
                title: task.title().to_string(),
                time,
            })
        })
        .collect();
    entries.sort_by_key(|entry| entry.time);
    entries
}

/// Every day of `year`-`month` with its entries. Empty for an invalid month.
pub fn month_agenda(tasks: &[ReminderTask], year: i32, month: u32) -> Vec<AgendaDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| AgendaDay {
            date,
            entries: agenda_on(tasks, date),
        })
        .collect()
}
