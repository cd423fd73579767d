//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。エンジンが外部に頼るもの
//! （時計、ID 生成、アラート、タスクの保存先）を trait で切り出す。

pub mod alert;
pub mod clock;
pub mod id_generator;
pub mod task_store;

pub use self::alert::{Alert, AlertError, AlertProfile, ProfileParseError};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::task_store::TaskStore;
