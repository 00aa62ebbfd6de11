//! Long-horizon goals with numeric progress and optional deadlines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub total: f64,
    pub progress: f64,
    pub unit: String,
    /// Derived true once progress reaches total; the user may also
    /// toggle it directly.
    pub completed: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Set once a deadline reminder has been acknowledged, suppressing
    /// duplicates on later scans.
    #[serde(default)]
    pub notified_soon: bool,
}

impl Goal {
    /// Progress fraction in `0.0..=1.0`, safe against a zero total.
    pub fn fraction(&self) -> f64 {
        if self.total <= 0.0 {
            0.0
        } else {
            (self.progress / self.total).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_zero_total() {
        let goal = Goal {
            id: "g".into(),
            name: "read".into(),
            total: 0.0,
            progress: 3.0,
            unit: "books".into(),
            completed: false,
            start_date: None,
            end_date: None,
            notified_soon: false,
        };
        assert_eq!(goal.fraction(), 0.0);
    }
}
