//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース。Clock から timestamp 部分を取るので、
//!   FixedClock を使うとテストでも timestamp が決定的になる。

use crate::domain::TaskId;
use crate::ports::Clock;
use chrono::Local;
use ulid::Ulid;

pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        // wall-clock times before the epoch collapse to zero
        let timestamp_ms = self
            .clock
            .now()
            .and_local_timezone(Local)
            .earliest()
            .map(|t| t.timestamp_millis().max(0) as u64)
            .unwrap_or_default();
        TaskId::from(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
