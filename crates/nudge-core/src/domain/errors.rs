//! Errors - エラー型と分類
//!
//! None of these are fatal to the process. Parse failures of single schedule
//! entries never surface here; they are reported as `ScheduleWarning`s.

use std::fmt;

use super::ids::TaskId;
use super::state::DeliveryState;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title is required")]
    EmptyTitle,
}

/// A transition requested on a task's delivery state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Due,
    Snooze,
    Complete,
}

impl fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationAction::Due => f.write_str("due"),
            NotificationAction::Snooze => f.write_str("snooze"),
            NotificationAction::Complete => f.write_str("complete"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The notification the user reacted to no longer matches the task.
    #[error("stale {action} on {task_id}: task is {state}")]
    StaleAction {
        task_id: TaskId,
        action: NotificationAction,
        state: DeliveryState,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReminderError {
    pub fn is_stale(&self) -> bool {
        matches!(self, ReminderError::StaleAction { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReminderError>;
