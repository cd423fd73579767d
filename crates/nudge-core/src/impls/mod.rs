//! Impls - ports の実装
//!
//! # 実装一覧
//! - **InMemoryTaskStore**: プロセス内のタスク保存先（永続化なし）
//! - **LogAlert**: tracing に出すだけのアラート
//! - **NoopAlert**: 何もしないアラート

pub mod alert;
pub mod inmem_store;

pub use self::alert::{LogAlert, NoopAlert};
pub use self::inmem_store::InMemoryTaskStore;
