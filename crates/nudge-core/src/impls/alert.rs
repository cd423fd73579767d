//! Alert implementations.
//!
//! - **LogAlert**: アラートを tracing に出すだけ（ヘッドレス・開発用）
//! - **NoopAlert**: 何もしない

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::domain::TaskId;
use crate::ports::{Alert, AlertError, AlertProfile};

/// Alert that logs and remembers which tasks currently have an active alert.
#[derive(Debug, Default)]
pub struct LogAlert {
    active: Mutex<HashMap<TaskId, AlertProfile>>,
}

impl LogAlert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks with a running alert and the profile each was started with.
    pub fn active(&self) -> HashMap<TaskId, AlertProfile> {
        self.active.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_active(&self, task_id: TaskId) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&task_id)
    }
}

#[async_trait]
impl Alert for LogAlert {
    async fn start_alert(&self, task_id: TaskId, profile: AlertProfile) -> Result<(), AlertError> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.insert(task_id, profile).is_none() {
            info!(task_id = %task_id, %profile, "alert started");
        }
        Ok(())
    }

    async fn stop_alert(&self, task_id: TaskId) -> Result<(), AlertError> {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.remove(&task_id).is_some() {
            info!(task_id = %task_id, "alert stopped");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAlert;

#[async_trait]
impl Alert for NoopAlert {
    async fn start_alert(&self, _task_id: TaskId, _profile: AlertProfile) -> Result<(), AlertError> {
        Ok(())
    }

    async fn stop_alert(&self, _task_id: TaskId) -> Result<(), AlertError> {
        Ok(())
    }
}
