//! ReminderPoller - due になったタスクの定期スキャン
//!
//! # フロー
//! 1. 一定間隔で起きる（唯一の suspension point）
//! 2. `now` を一度だけ取得し、その時刻で全タスクを評価
//! 3. `TaskStore::claim_due()` が Pending -> Reminding を確定させる
//! 4. DueEvent を unbounded channel に流す（送信で待たない）
//!
//! A task that was claimed is no longer Pending, so the next scan cannot
//! pick the same occurrence again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::DueEvent;
use crate::ports::{Clock, TaskStore};

pub struct ReminderPoller {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    due_tx: mpsc::UnboundedSender<DueEvent>,
}

impl ReminderPoller {
    pub fn new(
        store: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        due_tx: mpsc::UnboundedSender<DueEvent>,
    ) -> Self {
        Self {
            store,
            clock,
            interval,
            due_tx,
        }
    }

    /// Run one scan and return the events emitted.
    pub async fn scan_once(&self) -> Vec<DueEvent> {
        let now = self.clock.now();
        let events = self.store.claim_due(now).await;

        for event in &events {
            if self.due_tx.send(*event).is_err() {
                // the task stays Reminding; nothing will stop its alert
                warn!(task_id = %event.task_id, "due event dropped, no notification consumer");
            }
        }
        if !events.is_empty() {
            debug!(count = events.len(), %now, "due events emitted");
        }
        events
    }

    pub fn spawn(self, shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown_rx))
    }

    /// Scan every `interval` until shutdown is requested.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        info!(interval_ms, "reminder poller started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            self.scan_once().await;
        }
        info!("reminder poller stopped");
    }
}
