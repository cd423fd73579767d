//! nudge-core
//!
//! Weekly recurring reminder engine.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Weekday, TimeOfDay, Schedule, ReminderTask, DeliveryState, events, errors）と
//!   occurrence calculator
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, Alert, TaskStore）
//! - **app**: エンジン（EngineBuilder, ReminderPoller, NotificationController, agenda, status）
//! - **impls**: 実装（InMemoryTaskStore, LogAlert, NoopAlert）
//! - **config**: EngineConfig（TOML）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{Engine, EngineBuilder, NotificationController, ReminderPoller, RunningEngine};
pub use config::EngineConfig;
pub use domain::{
    DeliveryState, DueEvent, NotificationEvent, ReminderError, ReminderTask, Schedule, TaskContent,
    TaskId, TimeOfDay, Weekday,
};
