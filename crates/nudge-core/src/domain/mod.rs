//! Domain model (ids, schedule, task record, state, events, errors).
//!
//! Everything here is synchronous and clock-free; `now` is always passed in.

pub mod errors;
pub mod events;
pub mod ids;
pub mod occurrence;
pub mod schedule;
pub mod state;
pub mod task;
pub mod time_of_day;
pub mod weekday;

pub use self::errors::{NotificationAction, ReminderError, Result, ValidationError};
pub use self::events::{DueEvent, NotificationEvent};
pub use self::ids::TaskId;
pub use self::occurrence::{next_occurrence, occurrence_on};
pub use self::schedule::{Schedule, ScheduleWarning};
pub use self::state::{DeliveryState, StateCounts};
pub use self::task::{ReminderTask, TaskContent};
pub use self::time_of_day::{TimeOfDay, TimeParseError};
pub use self::weekday::{Weekday, WeekdayParseError};
