//! Alert port - ユーザーに知らせる外部の仕組み（音・バナー）
//!
//! Two calls per notification: start when it becomes due, stop when the user
//! snoozes or completes it. Each call carries the task id so concurrent
//! notifications keep separate alert lifecycles.
//!
//! # 契約
//! - `start_alert` は同じ task に対して繰り返し呼んでも安全
//! - `stop_alert` は alert が無いときに呼んでも安全

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::TaskId;

/// Named alert profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertProfile {
    #[default]
    Chime,
    Bell,
    Beep,
    /// Visual cue only. Also the fallback when a sound cannot start.
    Visual,
}

impl AlertProfile {
    pub const ALL: [AlertProfile; 4] = [
        AlertProfile::Chime,
        AlertProfile::Bell,
        AlertProfile::Beep,
        AlertProfile::Visual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertProfile::Chime => "chime",
            AlertProfile::Bell => "bell",
            AlertProfile::Beep => "beep",
            AlertProfile::Visual => "visual",
        }
    }
}

impl fmt::Display for AlertProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown alert profile '{0}'")]
pub struct ProfileParseError(pub String);

impl FromStr for AlertProfile {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        AlertProfile::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| ProfileParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertError {
    #[error("alert unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Alert: Send + Sync {
    async fn start_alert(&self, task_id: TaskId, profile: AlertProfile) -> Result<(), AlertError>;

    async fn stop_alert(&self, task_id: TaskId) -> Result<(), AlertError>;
}
