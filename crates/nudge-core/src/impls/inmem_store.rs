//! InMemoryTaskStore - プロセス内のタスク保存先
//!
//! # 実装詳細
//! - `Vec<ReminderTask>` が挿入順を保持し、`HashMap<TaskId, usize>` で引く
//! - tokio の Mutex 一つで集合全体を守る（ロック跨ぎの await はしない）
//! - 読み取りは clone を返すので、呼び出し側が見るのは常に完成したタスク
//! - 書き込みの `now` はロックを取ってから読む。claim 済みの occurrence より
//!   前の `next_due` が書かれることはない

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{
    DeliveryState, DueEvent, NotificationAction, ReminderError, ReminderTask, Result, StateCounts, TaskContent,
    TaskId,
};
use crate::ports::{Clock, IdGenerator, TaskStore, UlidGenerator};

struct InMemoryStoreState {
    /// Insertion order.
    tasks: Vec<ReminderTask>,

    /// TaskId -> position in `tasks`. Tasks are never removed, so positions are stable.
    index: HashMap<TaskId, usize>,
}

impl InMemoryStoreState {
    fn new() -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn get(&self, id: TaskId) -> Result<&ReminderTask> {
        self.index
            .get(&id)
            .and_then(|&pos| self.tasks.get(pos))
            .ok_or(ReminderError::TaskNotFound(id))
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut ReminderTask> {
        self.index
            .get(&id)
            .and_then(|&pos| self.tasks.get_mut(pos))
            .ok_or(ReminderError::TaskNotFound(id))
    }

    fn push(&mut self, task: ReminderTask) {
        self.index.insert(task.id(), self.tasks.len());
        self.tasks.push(task);
    }

    fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for task in &self.tasks {
            counts.record(task.state());
        }
        counts
    }
}

pub struct InMemoryTaskStore {
    state: Arc<Mutex<InMemoryStoreState>>,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl InMemoryTaskStore {
    /// Store with ULID ids driven by the same clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let ids = Box::new(UlidGenerator::new(Arc::clone(&clock)));
        Self::with_id_generator(clock, ids)
    }

    pub fn with_id_generator(clock: Arc<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryStoreState::new())),
            clock,
            ids,
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, content: TaskContent) -> Result<TaskId> {
        let content = content.validated()?;
        let id = self.ids.generate_task_id();
        let task = ReminderTask::new(id, content, self.clock.now());
        debug!(task_id = %id, title = task.title(), next_due = ?task.next_due(), "task created");

        self.state.lock().await.push(task);
        Ok(id)
    }

    async fn update(&self, id: TaskId, content: TaskContent) -> Result<DeliveryState> {
        let content = content.validated()?;

        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let task = state.get_mut(id)?;
        let previous = task.replace_content(content, now);
        debug!(task_id = %id, %previous, next_due = ?task.next_due(), "task updated, state reset to pending");
        Ok(previous)
    }

    async fn get(&self, id: TaskId) -> Result<ReminderTask> {
        let state = self.state.lock().await;
        state.get(id).cloned()
    }

    async fn list(&self) -> Vec<ReminderTask> {
        let state = self.state.lock().await;
        state.tasks.clone()
    }

    async fn claim_due(&self, now: NaiveDateTime) -> Vec<DueEvent> {
        let mut state = self.state.lock().await;
        let mut claimed = Vec::new();

        for task in state.tasks.iter_mut() {
            if !task.is_due(now) {
                continue;
            }
            let Some(due_at) = task.next_due() else {
                continue;
            };
            if task.begin_reminding() {
                claimed.push(DueEvent {
                    task_id: task.id(),
                    due_at,
                });
            }
        }

        claimed
    }

    async fn begin_reminding(&self, id: TaskId) -> Result<DueEvent> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let task = state.get_mut(id)?;

        let due_at = task.next_due().unwrap_or(now);
        if !task.begin_reminding() {
            return Err(ReminderError::StaleAction {
                task_id: id,
                action: NotificationAction::Due,
                state: task.state(),
            });
        }
        Ok(DueEvent { task_id: id, due_at })
    }

    async fn snooze(&self, id: TaskId, delay: Duration) -> Result<NaiveDateTime> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let task = state.get_mut(id)?;

        task.snooze(now, delay)?;
        let until = now + delay;
        info!(task_id = %id, %until, "task snoozed");
        Ok(until)
    }

    async fn complete(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.get_mut(id)?.complete()?;
        info!(task_id = %id, "task completed");
        Ok(())
    }

    async fn counts(&self) -> StateCounts {
        self.state.lock().await.counts()
    }
}
