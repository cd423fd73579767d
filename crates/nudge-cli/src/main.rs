use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, Timelike};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nudge_core::domain::{Schedule, TaskContent, TimeOfDay, Weekday};
use nudge_core::impls::LogAlert;
use nudge_core::{EngineBuilder, EngineConfig, TaskId};

/// Demo host: the first due notification of each task is snoozed, the
/// second one is completed.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nudge=info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), nudge_core::ReminderError> {
    // (A) config: optional TOML path as the first argument
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::default(),
    };

    let engine = EngineBuilder::new()
        .config(config)
        .alert(Arc::new(LogAlert::new()))
        .build()?;

    // (B) a task due at the next whole minute, plus one with a broken entry
    let soon = Local::now().naive_local() + Duration::minutes(1);
    let schedule = Schedule::new().with(
        Weekday::from_chrono(soon.weekday()),
        TimeOfDay::from_hm(soon.hour() as u8, soon.minute() as u8).unwrap_or_default(),
    );
    let id = engine
        .store()
        .create(TaskContent::new("Stretch", "stand up and stretch", schedule))
        .await?;
    info!(task_id = %id, "demo task created");

    let (weekly, warnings) = Schedule::parse_entries([
        (Weekday::Tuesday, "25:99 AM"),
        (Weekday::Friday, "05:30 PM"),
    ]);
    info!(dropped = warnings.len(), summary = %weekly.summary(), "parsed weekly schedule");
    let review = engine
        .store()
        .create(TaskContent::new("Weekly review", "", weekly.clone()))
        .await?;
    // edits go through the controller so an outstanding alert is stopped
    engine
        .controller()
        .update(review, TaskContent::new("Weekly review", "plan next week", weekly))
        .await?;

    // (C) due events -> this loop
    let (due_tx, mut due_rx) = mpsc::unbounded_channel::<TaskId>();
    engine.controller().subscribe_due(move |task_id| {
        let _ = due_tx.send(task_id);
    });

    let running = engine.start();
    let mut seen: HashMap<TaskId, u32> = HashMap::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(task_id) = due_rx.recv() => {
                let count = seen.entry(task_id).or_default();
                *count += 1;
                let result = if *count == 1 {
                    engine.controller().snooze(task_id).await.map(|until| {
                        info!(task_id = %task_id, %until, "snoozed");
                    })
                } else {
                    engine.controller().complete(task_id).await
                };
                if let Err(e) = result {
                    error!(task_id = %task_id, "action failed: {e}");
                }
            }
        }
    }

    // (D) shutdown
    running.shutdown_and_join().await;
    let status = engine.status().await;
    info!(
        pending = status.counts.pending,
        reminding = status.counts.reminding,
        completed = status.counts.completed,
        total = status.counts.total(),
        "final status"
    );
    Ok(())
}
