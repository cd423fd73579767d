//! TaskStore port - タスク集合の正本（source of truth）
//!
//! # 設計原則
//! - State と `next_due` を書き換えるのはここだけ
//! - 書き込みは直列化される（single writer at a time）
//! - 読み取りは一貫したスナップショット（更新途中のタスクは見えない）
//! - `claim_due` は Pending -> Reminding の遷移と due event の生成を同じ
//!   クリティカルセクションで行う。同じ occurrence が二度 claim されることはない

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};

use crate::domain::{DeliveryState, DueEvent, ReminderTask, Result, StateCounts, TaskContent, TaskId};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Validate and append a new Pending task. Errors leave the store unchanged.
    async fn create(&self, content: TaskContent) -> Result<TaskId>;

    /// Replace a task's content, reset it to Pending and recompute `next_due`.
    /// Returns the state the task had before the edit.
    ///
    /// Hosts edit through `NotificationController::update`, which also stops
    /// the alert of a task that was Reminding.
    async fn update(&self, id: TaskId, content: TaskContent) -> Result<DeliveryState>;

    async fn get(&self, id: TaskId) -> Result<ReminderTask>;

    /// All tasks in insertion order.
    async fn list(&self) -> Vec<ReminderTask>;

    /// Move every Pending task with `next_due <= now` to Reminding and
    /// return one event per moved task, in insertion order.
    async fn claim_due(&self, now: NaiveDateTime) -> Vec<DueEvent>;

    /// Pending -> Reminding for a single task, regardless of `next_due`.
    async fn begin_reminding(&self, id: TaskId) -> Result<DueEvent>;

    /// Reminding -> Pending with `next_due = now + delay`. Returns the new `next_due`.
    async fn snooze(&self, id: TaskId, delay: Duration) -> Result<NaiveDateTime>;

    /// Reminding -> Completed.
    async fn complete(&self, id: TaskId) -> Result<()>;

    async fn counts(&self) -> StateCounts;
}
