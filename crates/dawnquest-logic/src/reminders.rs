//! Date-only deadline scan for goals and events.
//!
//! Day differences are computed on calendar dates with time-of-day
//! stripped. A reminder fires while `0 <= days_left <= lead`; a negative
//! difference (deadline already passed) emits nothing — there is no
//! overdue status in this core. Acknowledged entries are suppressed on
//! later scans.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::events::ScheduledEvent;
use crate::goals::Goal;

/// Fixed reminder lead for goal deadlines, in days.
pub const GOAL_LEAD_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Goal,
    Event,
}

/// One upcoming-deadline warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub kind: ReminderKind,
    /// Id of the goal or event that triggered the warning.
    pub source_id: String,
    pub days_left: i64,
    pub message: String,
}

/// Scan goals and events for deadlines near `today`.
pub fn scan(goals: &[Goal], events: &[ScheduledEvent], today: NaiveDate) -> Vec<Reminder> {
    let mut out = Vec::new();

    for goal in goals {
        if goal.completed || goal.notified_soon {
            continue;
        }
        let Some(end) = goal.end_date else { continue };
        let days = end.signed_duration_since(today).num_days();
        if (0..=GOAL_LEAD_DAYS).contains(&days) {
            out.push(Reminder {
                kind: ReminderKind::Goal,
                source_id: goal.id.clone(),
                days_left: days,
                message: format!("{} ends in {} days!", goal.name, days),
            });
        }
    }

    for event in events {
        if !event.is_pending() || event.notified_soon {
            continue;
        }
        let days = event.date.signed_duration_since(today).num_days();
        if (0..=event.lead_days).contains(&days) {
            out.push(Reminder {
                kind: ReminderKind::Event,
                source_id: event.id.clone(),
                days_left: days,
                message: format!("{} is coming up! ({}d)", event.name, days),
            });
        }
    }

    out
}
