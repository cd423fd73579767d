//! ReminderTask - タスクレコード
//!
//! Holds identity, content, schedule, delivery state and the cached
//! `next_due`. Mutation goes through the store; the transition methods here
//! are `pub(crate)` so nothing outside the crate can bypass it.
//!
//! # Invariant
//! `next_due.is_some()` iff the schedule is non-empty and the state is
//! Pending or Reminding.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::errors::{NotificationAction, ReminderError, ValidationError};
use super::ids::TaskId;
use super::occurrence::next_occurrence;
use super::schedule::Schedule;
use super::state::DeliveryState;

/// Editable part of a task (what the editor submits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContent {
    pub title: String,
    pub description: String,
    pub schedule: Schedule,
}

impl TaskContent {
    pub fn new(title: impl Into<String>, description: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            schedule,
        }
    }

    /// Trim title/description and reject an empty title.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            schedule: self.schedule,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTask {
    id: TaskId,
    content: TaskContent,
    state: DeliveryState,
    next_due: Option<NaiveDateTime>,
}

impl ReminderTask {
    /// `content` must already be validated.
    pub(crate) fn new(id: TaskId, content: TaskContent, now: NaiveDateTime) -> Self {
        let next_due = next_occurrence(&content.schedule, now);
        Self {
            id,
            content,
            state: DeliveryState::Pending,
            next_due,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.content.title
    }

    pub fn description(&self) -> &str {
        &self.content.description
    }

    pub fn schedule(&self) -> &Schedule {
        &self.content.schedule
    }

    pub fn content(&self) -> &TaskContent {
        &self.content
    }

    pub fn state(&self) -> DeliveryState {
        self.state
    }

    pub fn next_due(&self) -> Option<NaiveDateTime> {
        self.next_due
    }

    /// Pending with a `next_due` at or before `now`.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.state.is_schedulable() && self.next_due.is_some_and(|due| due <= now)
    }

    /// Replace the content. Editing always resets the task to Pending.
    /// Returns the state the task was in before the edit.
    pub(crate) fn replace_content(&mut self, content: TaskContent, now: NaiveDateTime) -> DeliveryState {
        self.next_due = next_occurrence(&content.schedule, now);
        self.content = content;
        std::mem::replace(&mut self.state, DeliveryState::Pending)
    }

    /// Pending -> Reminding. Returns `false` (and changes nothing) from any
    /// other state or when the task has nothing scheduled.
    pub(crate) fn begin_reminding(&mut self) -> bool {
        if self.state != DeliveryState::Pending || self.next_due.is_none() {
            return false;
        }
        self.state = DeliveryState::Reminding;
        true
    }

    /// Reminding -> Pending, due again at `now + delay`.
    pub(crate) fn snooze(&mut self, now: NaiveDateTime, delay: Duration) -> Result<(), ReminderError> {
        self.expect_reminding(NotificationAction::Snooze)?;
        self.next_due = Some(now + delay);
        self.state = DeliveryState::Pending;
        Ok(())
    }

    /// Reminding -> Completed.
    pub(crate) fn complete(&mut self) -> Result<(), ReminderError> {
        self.expect_reminding(NotificationAction::Complete)?;
        self.next_due = None;
        self.state = DeliveryState::Completed;
        Ok(())
    }

    fn expect_reminding(&self, action: NotificationAction) -> Result<(), ReminderError> {
        if self.state == DeliveryState::Reminding {
            Ok(())
        } else {
            Err(ReminderError::StaleAction {
                task_id: self.id,
                action,
                state: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TimeOfDay, Weekday};
    use chrono::{NaiveDate, NaiveTime};
    use ulid::Ulid;

    // 2024-01-01 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    fn wednesday_nine() -> Schedule {
        Schedule::new().with(Weekday::Wednesday, TimeOfDay::from_hm(9, 0).unwrap())
    }

    fn task(schedule: Schedule) -> ReminderTask {
        let content = TaskContent::new("Gym", "chest day", schedule).validated().unwrap();
        ReminderTask::new(TaskId::from(Ulid::new()), content, at(1, 0, 0))
    }

    #[test]
    fn validation_trims_and_rejects_empty_title() {
        let content = TaskContent::new("  Gym  ", " notes ", Schedule::new())
            .validated()
            .unwrap();
        assert_eq!(content.title, "Gym");
        assert_eq!(content.description, "notes");

        let err = TaskContent::new("   ", "", Schedule::new()).validated();
        assert_eq!(err, Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn new_task_is_pending_with_next_due() {
        let task = task(wednesday_nine());
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(3, 9, 0)));
        assert!(!task.is_due(at(3, 8, 59)));
        assert!(task.is_due(at(3, 9, 0)));
    }

    #[test]
    fn empty_schedule_never_reminds() {
        let mut task = task(Schedule::new());
        assert_eq!(task.next_due(), None);
        assert!(!task.is_due(at(30, 0, 0)));
        assert!(!task.begin_reminding());
        assert_eq!(task.state(), DeliveryState::Pending);
    }

    #[test]
    fn snooze_and_complete_require_reminding() {
        let mut task = task(wednesday_nine());

        let err = task.snooze(at(3, 9, 0), Duration::minutes(5)).unwrap_err();
        assert!(err.is_stale());
        assert!(task.complete().unwrap_err().is_stale());
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(3, 9, 0)));

        assert!(task.begin_reminding());
        assert!(!task.begin_reminding());

        task.snooze(at(3, 9, 0), Duration::minutes(5)).unwrap();
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(3, 9, 5)));

        assert!(task.begin_reminding());
        task.complete().unwrap();
        assert_eq!(task.state(), DeliveryState::Completed);
        assert_eq!(task.next_due(), None);
        assert!(task.complete().unwrap_err().is_stale());
    }

    #[test]
    fn editing_resets_to_pending() {
        let mut task = task(wednesday_nine());
        assert!(task.begin_reminding());
        task.complete().unwrap();

        let content = TaskContent::new("Gym", "", wednesday_nine());
        let previous = task.replace_content(content, at(3, 10, 0));
        assert_eq!(previous, DeliveryState::Completed);
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(10, 9, 0)));
    }
}
