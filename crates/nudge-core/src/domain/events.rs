//! Events - ドメインイベント
//!
//! `DueEvent` flows from the poller to the notification controller over a
//! channel. `NotificationEvent` is what the controller publishes to hosts.

use chrono::NaiveDateTime;

use super::ids::TaskId;

/// A task reached its `next_due`. The store has already moved it to
/// Reminding when this is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueEvent {
    pub task_id: TaskId,
    /// The occurrence that fired.
    pub due_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    Due(DueEvent),
    Snoozed {
        task_id: TaskId,
        until: NaiveDateTime,
    },
    Completed {
        task_id: TaskId,
    },
}

impl NotificationEvent {
    pub fn task_id(&self) -> TaskId {
        match self {
            NotificationEvent::Due(due) => due.task_id,
            NotificationEvent::Snoozed { task_id, .. } => *task_id,
            NotificationEvent::Completed { task_id } => *task_id,
        }
    }
}
