//! App - アプリケーション層
//!
//! ports を組み合わせてエンジンを動かす。
//!
//! # 主要コンポーネント
//! - **EngineBuilder / Engine**: 構築とワイヤリング、バックグラウンドループの起動
//! - **ReminderPoller**: due になったタスクの定期スキャン
//! - **NotificationController**: due event の配信、snooze / complete
//! - **agenda**: カレンダー用のデータ
//! - **Status**: 状態ごとの件数と次の due

pub mod agenda;
pub mod builder;
pub mod notifier;
pub mod poller;
pub mod status;

pub use self::agenda::{AgendaDay, AgendaEntry, agenda_on, month_agenda};
pub use self::builder::{Engine, EngineBuilder, RunningEngine};
pub use self::notifier::NotificationController;
pub use self::poller::ReminderPoller;
pub use self::status::Status;
