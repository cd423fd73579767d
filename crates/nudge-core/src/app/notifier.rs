//! NotificationController - due event の受け手と snooze / complete
//!
//! # フロー
//! 1. poller が store で Pending -> Reminding を claim し、DueEvent を channel に流す
//! 2. `run()` が受け取り、状態を再確認してアラート開始・購読者へ通知
//! 3. ユーザーの snooze / complete は store の遷移が成功したときだけアラートを止める
//! 4. 編集（`update`）で Reminding から外れたタスクはアラートを止める
//!
//! Stale actions (the task is no longer Reminding) are reported as
//! `ReminderError::StaleAction` and change nothing.
//!
//! Every operation that reads or changes a task's state and then starts or
//! stops its alert holds `actions` for the whole sequence, so an alert is
//! only ever running for a task that is Reminding.

use std::sync::{Arc, RwLock};

use chrono::{Duration, NaiveDateTime};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, info, warn};

use crate::domain::{
    DeliveryState, DueEvent, NotificationEvent, ReminderError, Result, TaskContent, TaskId,
};
use crate::ports::{Alert, AlertProfile, TaskStore};

type Subscriber = Box<dyn Fn(&NotificationEvent) + Send + Sync>;

pub struct NotificationController {
    store: Arc<dyn TaskStore>,
    alert: Arc<dyn Alert>,
    profile: AlertProfile,
    snooze_delay: Duration,
    subscribers: RwLock<Vec<Subscriber>>,
    actions: Mutex<()>,
}

impl NotificationController {
    pub fn new(
        store: Arc<dyn TaskStore>,
        alert: Arc<dyn Alert>,
        profile: AlertProfile,
        snooze_delay: Duration,
    ) -> Self {
        Self {
            store,
            alert,
            profile,
            snooze_delay,
            subscribers: RwLock::new(Vec::new()),
            actions: Mutex::new(()),
        }
    }

    /// Register a callback for every notification event.
    ///
    /// Callbacks run on the controller's task; hosts with thread-affinity
    /// rules should forward to their own UI context from inside the callback.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&NotificationEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(callback));
    }

    /// Register a callback that only receives the ids of tasks that became due.
    pub fn subscribe_due<F>(&self, callback: F)
    where
        F: Fn(TaskId) + Send + Sync + 'static,
    {
        self.subscribe(move |event| {
            if let NotificationEvent::Due(due) = event {
                callback(due.task_id);
            }
        });
    }

    /// Fire a task now: Pending -> Reminding, start the alert, notify.
    pub async fn on_due(&self, task_id: TaskId) -> Result<DueEvent> {
        let _guard = self.actions.lock().await;
        let event = self.store.begin_reminding(task_id).await.inspect_err(|err| {
            if err.is_stale() {
                warn!(task_id = %task_id, %err, "ignoring due trigger");
            }
        })?;
        self.announce(event).await;
        Ok(event)
    }

    /// Handle an event the store has already claimed (poller path).
    ///
    /// The task is re-read first; if it left Reminding while the event was in
    /// flight (edited, snoozed, completed) nothing happens.
    pub async fn deliver(&self, event: DueEvent) {
        let _guard = self.actions.lock().await;
        match self.store.get(event.task_id).await {
            Ok(task) if task.state() == DeliveryState::Reminding => self.announce(event).await,
            Ok(task) => {
                debug!(task_id = %event.task_id, state = %task.state(), "dropping stale due event");
            }
            Err(err) => warn!(task_id = %event.task_id, %err, "dropping due event"),
        }
    }

    /// Snooze with the configured default delay.
    pub async fn snooze(&self, task_id: TaskId) -> Result<NaiveDateTime> {
        self.snooze_for(task_id, self.snooze_delay).await
    }

    /// Reminding -> Pending, due again after `delay`. Stops the alert.
    pub async fn snooze_for(&self, task_id: TaskId, delay: Duration) -> Result<NaiveDateTime> {
        let _guard = self.actions.lock().await;
        let until = self
            .store
            .snooze(task_id, delay)
            .await
            .inspect_err(|err| log_rejected(task_id, err))?;

        self.stop_alert(task_id).await;
        self.publish(&NotificationEvent::Snoozed { task_id, until });
        Ok(until)
    }

    /// Reminding -> Completed. Stops the alert.
    pub async fn complete(&self, task_id: TaskId) -> Result<()> {
        let _guard = self.actions.lock().await;
        self.store
            .complete(task_id)
            .await
            .inspect_err(|err| log_rejected(task_id, err))?;

        self.stop_alert(task_id).await;
        self.publish(&NotificationEvent::Completed { task_id });
        Ok(())
    }

    /// Edit a task. The task goes back to Pending; if a notification was
    /// outstanding its alert is stopped.
    pub async fn update(&self, task_id: TaskId, content: TaskContent) -> Result<()> {
        let _guard = self.actions.lock().await;
        let previous = self.store.update(task_id, content).await?;
        if previous == DeliveryState::Reminding {
            debug!(task_id = %task_id, "outstanding notification cancelled by edit");
            self.stop_alert(task_id).await;
        }
        Ok(())
    }

    /// Consume due events until shutdown or until the sending side is gone.
    pub async fn run(
        self: Arc<Self>,
        mut due_rx: mpsc::UnboundedReceiver<DueEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let event = tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                event = due_rx.recv() => event,
            };

            let Some(event) = event else {
                debug!("due channel closed, notification loop exiting");
                break;
            };
            self.deliver(event).await;
        }
    }

    async fn announce(&self, event: DueEvent) {
        info!(task_id = %event.task_id, due_at = %event.due_at, "reminder due");
        self.start_alert(event.task_id).await;
        self.publish(&NotificationEvent::Due(event));
    }

    /// Start the configured alert; fall back to a visual cue when it is unavailable.
    async fn start_alert(&self, task_id: TaskId) {
        let Err(err) = self.alert.start_alert(task_id, self.profile).await else {
            return;
        };
        warn!(task_id = %task_id, profile = %self.profile, %err, "alert failed, falling back to visual cue");

        if self.profile == AlertProfile::Visual {
            return;
        }
        if let Err(err) = self.alert.start_alert(task_id, AlertProfile::Visual).await {
            warn!(task_id = %task_id, %err, "visual fallback failed");
        }
    }

    async fn stop_alert(&self, task_id: TaskId) {
        if let Err(err) = self.alert.stop_alert(task_id).await {
            warn!(task_id = %task_id, %err, "failed to stop alert");
        }
    }

    fn publish(&self, event: &NotificationEvent) {
        let subscribers = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        for subscriber in subscribers.iter() {
            subscriber(event);
        }
    }
}

fn log_rejected(task_id: TaskId, err: &ReminderError) {
    if err.is_stale() {
        warn!(task_id = %task_id, %err, "stale notification action ignored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Schedule, TaskContent, TimeOfDay, Weekday};
    use crate::impls::{InMemoryTaskStore, LogAlert};
    use crate::ports::{AlertError, Clock, FixedClock};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::Mutex;

    // 2024-01-01 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    struct Fixture {
        clock: FixedClock,
        store: Arc<InMemoryTaskStore>,
        alert: Arc<LogAlert>,
        controller: NotificationController,
    }

    fn fixture(now: NaiveDateTime) -> Fixture {
        let clock = FixedClock::new(now);
        let store = Arc::new(InMemoryTaskStore::new(Arc::new(clock.clone())));
        let alert = Arc::new(LogAlert::new());
        let controller = NotificationController::new(
            store.clone(),
            alert.clone(),
            AlertProfile::Chime,
            Duration::minutes(5),
        );
        Fixture {
            clock,
            store,
            alert,
            controller,
        }
    }

    async fn monday_eight(f: &Fixture) -> TaskId {
        let schedule = Schedule::new().with(Weekday::Monday, TimeOfDay::from_hm(8, 0).unwrap());
        f.store
            .create(TaskContent::new("meds", "", schedule))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn on_due_starts_alert_and_notifies() {
        let f = fixture(at(1, 7, 0));
        let id = monday_eight(&f).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        f.controller.subscribe_due(move |task_id| sink.lock().unwrap().push(task_id));

        f.controller.on_due(id).await.unwrap();
        assert!(f.alert.is_active(id));
        assert_eq!(*seen.lock().unwrap(), vec![id]);

        // only from Pending
        assert!(f.controller.on_due(id).await.unwrap_err().is_stale());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn snooze_stops_alert_and_reschedules() {
        let f = fixture(at(1, 8, 0));
        let id = monday_eight(&f).await;
        f.clock.set(at(1, 8, 0));
        f.controller.on_due(id).await.unwrap();

        let until = f.controller.snooze(id).await.unwrap();
        assert_eq!(until, at(1, 8, 5));
        assert!(!f.alert.is_active(id));

        let task = f.store.get(id).await.unwrap();
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(1, 8, 5)));
    }

    #[tokio::test]
    async fn stale_actions_change_nothing() {
        let f = fixture(at(1, 7, 0));
        let id = monday_eight(&f).await;

        assert!(f.controller.snooze(id).await.unwrap_err().is_stale());
        assert!(f.controller.complete(id).await.unwrap_err().is_stale());
        let task = f.store.get(id).await.unwrap();
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(1, 8, 0)));

        f.controller.on_due(id).await.unwrap();
        f.controller.complete(id).await.unwrap();
        assert!(!f.alert.is_active(id));

        // second complete from another path
        assert!(f.controller.complete(id).await.unwrap_err().is_stale());
        assert!(f.controller.snooze(id).await.unwrap_err().is_stale());
        assert_eq!(f.store.get(id).await.unwrap().state(), DeliveryState::Completed);
    }

    #[tokio::test]
    async fn deliver_skips_events_that_went_stale_in_flight() {
        let f = fixture(at(1, 7, 0));
        let id = monday_eight(&f).await;

        let events = f.store.claim_due(at(1, 8, 0)).await;
        assert_eq!(events.len(), 1);

        // edited before the event is delivered
        let content = f.store.get(id).await.unwrap().content().clone();
        f.store.update(id, content).await.unwrap();

        f.controller.deliver(events[0]).await;
        assert!(!f.alert.is_active(id));
    }

    #[tokio::test]
    async fn editing_a_reminding_task_stops_its_alert() {
        let f = fixture(at(1, 7, 0));
        let id = monday_eight(&f).await;
        f.controller.on_due(id).await.unwrap();
        assert!(f.alert.is_active(id));

        let tuesday = Schedule::new().with(Weekday::Tuesday, TimeOfDay::from_hm(8, 0).unwrap());
        f.controller
            .update(id, TaskContent::new("meds", "after breakfast", tuesday))
            .await
            .unwrap();

        assert!(!f.alert.is_active(id));
        let task = f.store.get(id).await.unwrap();
        assert_eq!(task.state(), DeliveryState::Pending);
        assert_eq!(task.next_due(), Some(at(2, 8, 0)));

        // the notification still on screen is stale now
        assert!(f.controller.snooze(id).await.unwrap_err().is_stale());
        assert!(f.controller.complete(id).await.unwrap_err().is_stale());
    }

    #[tokio::test]
    async fn rejected_edit_keeps_the_alert() {
        let f = fixture(at(1, 7, 0));
        let id = monday_eight(&f).await;
        f.controller.on_due(id).await.unwrap();

        let err = f
            .controller
            .update(id, TaskContent::new("  ", "", Schedule::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReminderError::Validation(_)));
        assert!(f.alert.is_active(id));
        assert_eq!(f.store.get(id).await.unwrap().state(), DeliveryState::Reminding);
    }

    struct BrokenSpeaker {
        started: Mutex<Vec<AlertProfile>>,
    }

    #[async_trait]
    impl Alert for BrokenSpeaker {
        async fn start_alert(&self, _task_id: TaskId, profile: AlertProfile) -> std::result::Result<(), AlertError> {
            if profile != AlertProfile::Visual {
                return Err(AlertError::Unavailable("no audio device".to_string()));
            }
            self.started.lock().unwrap().push(profile);
            Ok(())
        }

        async fn stop_alert(&self, _task_id: TaskId) -> std::result::Result<(), AlertError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unavailable_alert_falls_back_to_visual() {
        let clock = FixedClock::new(at(1, 7, 0));
        let store = Arc::new(InMemoryTaskStore::new(Arc::new(clock.clone())));
        let speaker = Arc::new(BrokenSpeaker {
            started: Mutex::new(Vec::new()),
        });
        let controller = NotificationController::new(
            store.clone(),
            speaker.clone(),
            AlertProfile::Bell,
            Duration::minutes(5),
        );
        let schedule = Schedule::new().with(Weekday::Monday, TimeOfDay::from_hm(8, 0).unwrap());
        let id = store.create(TaskContent::new("x", "", schedule)).await.unwrap();

        controller.on_due(id).await.unwrap();
        assert_eq!(*speaker.started.lock().unwrap(), vec![AlertProfile::Visual]);
        assert_eq!(store.get(id).await.unwrap().state(), DeliveryState::Reminding);
        assert_eq!(clock.now(), at(1, 7, 0));
    }

    #[tokio::test]
    async fn run_loop_delivers_and_stops_on_shutdown() {
        let f = fixture(at(1, 7, 0));
        let id = monday_eight(&f).await;
        let controller = Arc::new(f.controller);

        let (due_tx, due_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        controller.subscribe_due(move |task_id| {
            let _ = seen_tx.send(task_id);
        });

        let join = tokio::spawn(controller.clone().run(due_rx, shutdown_rx));

        for event in f.store.claim_due(at(1, 8, 0)).await {
            due_tx.send(event).unwrap();
        }
        let delivered = tokio::time::timeout(std::time::Duration::from_secs(1), seen_rx.recv())
            .await
            .unwrap();
        assert_eq!(delivered, Some(id));
        assert!(f.alert.is_active(id));

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), join)
            .await
            .unwrap()
            .unwrap();
    }
}
