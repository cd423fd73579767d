//! Status - 現在の配信状況のまとめ

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{ReminderTask, StateCounts, TaskId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub counts: StateCounts,
    /// Soonest pending reminder, if any.
    pub next_due: Option<(TaskId, NaiveDateTime)>,
}

impl Status {
    /// `counts` as reported by `TaskStore::counts`; `tasks` only feed `next_due`.
    pub fn new(counts: StateCounts, tasks: &[ReminderTask]) -> Self {
        let next_due = tasks
            .iter()
            .filter(|task| task.state().is_schedulable())
            .filter_map(|task| task.next_due().map(|due| (task.id(), due)))
            .min_by_key(|(_, due)| *due);

        Self { counts, next_due }
    }
}
