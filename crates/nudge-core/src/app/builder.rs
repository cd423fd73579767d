//! EngineBuilder - エンジンの構築とワイヤリング
//!
//! Wires store, poller and notification controller together. `build()`
//! validates the config up front (fail-fast) so a bad interval or snooze
//! delay never reaches the running loops.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::app::agenda::{AgendaDay, AgendaEntry, agenda_on, month_agenda};
use crate::app::notifier::NotificationController;
use crate::app::poller::ReminderPoller;
use crate::app::status::Status;
use crate::config::EngineConfig;
use crate::domain::Result;
use crate::impls::{InMemoryTaskStore, LogAlert};
use crate::ports::{Alert, Clock, SystemClock, TaskStore};

/// # 使用例
/// ```ignore
/// let engine = EngineBuilder::new()
///     .config(config)
///     .alert(Arc::new(MyAlert))
///     .build()?;
/// let running = engine.start();
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    clock: Option<Arc<dyn Clock>>,
    alert: Option<Arc<dyn Alert>>,
    store: Option<Arc<dyn TaskStore>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            clock: None,
            alert: None,
            store: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn alert(mut self, alert: Arc<dyn Alert>) -> Self {
        self.alert = Some(alert);
        self
    }

    /// Use an existing store instead of a fresh in-memory one.
    pub fn store(mut self, store: Arc<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Defaults: `SystemClock`, `LogAlert`, `InMemoryTaskStore` on that clock.
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let alert = self
            .alert
            .unwrap_or_else(|| Arc::new(LogAlert::new()) as Arc<dyn Alert>);
        let store = self.store.unwrap_or_else(|| {
            Arc::new(InMemoryTaskStore::new(Arc::clone(&clock))) as Arc<dyn TaskStore>
        });

        let controller = Arc::new(NotificationController::new(
            Arc::clone(&store),
            alert,
            self.config.alert_profile,
            self.config.snooze_delay(),
        ));

        Ok(Engine {
            config: self.config,
            clock,
            store,
            controller,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    store: Arc<dyn TaskStore>,
    controller: Arc<NotificationController>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    pub fn controller(&self) -> &Arc<NotificationController> {
        &self.controller
    }

    pub async fn status(&self) -> Status {
        let counts = self.store.counts().await;
        Status::new(counts, &self.store.list().await)
    }

    pub async fn agenda_on(&self, date: chrono::NaiveDate) -> Vec<AgendaEntry> {
        agenda_on(&self.store.list().await, date)
    }

    pub async fn month_agenda(&self, year: i32, month: u32) -> Vec<AgendaDay> {
        month_agenda(&self.store.list().await, year, month)
    }

    /// Spawn the poller and the notification loop.
    pub fn start(&self) -> RunningEngine {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (due_tx, due_rx) = mpsc::unbounded_channel();

        let poller = ReminderPoller::new(
            Arc::clone(&self.store),
            Arc::clone(&self.clock),
            self.config.poll_interval(),
            due_tx,
        );

        let joins = vec![
            poller.spawn(shutdown_rx.clone()),
            tokio::spawn(Arc::clone(&self.controller).run(due_rx, shutdown_rx)),
        ];
        info!(
            poll_interval_secs = self.config.poll_interval_secs,
            snooze_minutes = self.config.snooze_minutes,
            alert_profile = %self.config.alert_profile,
            "reminder engine started"
        );

        RunningEngine { shutdown_tx, joins }
    }
}

/// Handle to the background loops.
/// - `request_shutdown()` で両ループに停止を通知
/// - `shutdown_and_join()` で終了まで待つ
pub struct RunningEngine {
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl RunningEngine {
    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        for join in self.joins {
            let _ = join.await;
        }
        info!("reminder engine stopped");
    }
}
