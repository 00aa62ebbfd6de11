//! Scheduled events with per-event reminder lead times.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    /// How many days ahead of the date a reminder fires.
    pub lead_days: i64,
    pub status: EventStatus,
    #[serde(default)]
    pub notified_soon: bool,
}

impl ScheduledEvent {
    pub fn is_pending(&self) -> bool {
        self.status == EventStatus::Pending
    }
}
