//! DeliveryState - リマインダーの配信状態
//!
//! # 状態遷移
//! - Pending -> Reminding（due 検出 / on_due）
//! - Reminding -> Pending（snooze）
//! - Reminding -> Completed（complete）
//! - any -> Pending（タスク編集）

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryState {
    /// Waiting for `next_due`.
    Pending,

    /// A notification is outstanding; the alert is running.
    Reminding,

    /// Acknowledged by the user. Terminal until the task is edited.
    Completed,
}

impl DeliveryState {
    /// Only pending tasks are looked at by the poller.
    pub fn is_schedulable(self) -> bool {
        matches!(self, DeliveryState::Pending)
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryState::Pending => "pending",
            DeliveryState::Reminding => "reminding",
            DeliveryState::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Number of tasks per delivery state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub pending: usize,
    pub reminding: usize,
    pub completed: usize,
}

impl StateCounts {
    pub fn record(&mut self, state: DeliveryState) {
        match state {
            DeliveryState::Pending => self.pending += 1,
            DeliveryState::Reminding => self.reminding += 1,
            DeliveryState::Completed => self.completed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.reminding + self.completed
    }
}
