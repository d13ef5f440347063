//! Engine configuration.
//!
//! Every tunable constant of the scheduler and the analyses lives here so a
//! caller can load it alongside the project (it is serde-friendly) or build
//! it in code. `EngineOptions::default()` reproduces the product behavior.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{DurationMode, DEFAULT_CAPACITY_HOURS};

/// Which deadline checks the risk detector runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineCheck {
    /// No deadline risk.
    Off,
    /// Only report finishing after the manual deadline.
    LatenessOnly,
    /// Lateness, plus a warning when the margin is small.
    #[default]
    LatenessAndMargin,
}

/// Tunables for propagation and analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Pass cap = `iteration_factor × task count` (at least one pass).
    pub iteration_factor: usize,
    /// Max calendar days walked looking for the next working day.
    pub advance_limit_days: u32,
    /// Max calendar days walked while counting a duration.
    pub duration_limit_days: u32,
    pub duration_mode: DurationMode,
    /// Calendar-day gap after a predecessor.
    pub default_gap_days: i64,
    /// Gap when a frontend task follows a backend task.
    pub handoff_gap_days: i64,
    /// Calendar days added to the resolved deadline.
    pub deadline_buffer_days: i64,
    /// Daily hours assumed for people missing from the roster.
    pub default_capacity_hours: f64,
    /// Tasks shorter than this (days) are flagged when a holiday interrupts them.
    pub short_task_days: u32,
    /// Unplanned-effort share above which carry-over is flagged.
    pub carry_over_threshold: f64,
    pub deadline_check: DeadlineCheck,
    /// Margin (days) under which the low-margin warning fires.
    pub low_margin_days: i64,
    /// Share of sprint capacity a person may be loaded with.
    pub sprint_utilization: f64,
    /// Fallback "today" when the project start cannot be read.
    /// `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            iteration_factor: 2,
            advance_limit_days: 365,
            duration_limit_days: 1000,
            duration_mode: DurationMode::WorkingStartOnly,
            default_gap_days: 1,
            handoff_gap_days: 3,
            deadline_buffer_days: 7,
            default_capacity_hours: DEFAULT_CAPACITY_HOURS,
            short_task_days: 3,
            carry_over_threshold: 0.2,
            deadline_check: DeadlineCheck::LatenessAndMargin,
            low_margin_days: 3,
            sprint_utilization: 0.7,
            today: None,
        }
    }
}

impl EngineOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the iteration factor.
    pub fn with_iteration_factor(mut self, factor: usize) -> Self {
        self.iteration_factor = factor;
        self
    }

    /// Sets the duration counting mode.
    pub fn with_duration_mode(mut self, mode: DurationMode) -> Self {
        self.duration_mode = mode;
        self
    }

    /// Sets which deadline checks run.
    pub fn with_deadline_check(mut self, check: DeadlineCheck) -> Self {
        self.deadline_check = check;
        self
    }

    /// Sets the advance and duration walk limits.
    pub fn with_walk_limits(mut self, advance_days: u32, duration_days: u32) -> Self {
        self.advance_limit_days = advance_days;
        self.duration_limit_days = duration_days;
        self
    }

    /// Pins "today" for deterministic fallbacks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Pass cap for `task_count` tasks.
    pub fn iteration_cap(&self, task_count: usize) -> usize {
        if task_count == 0 {
            0
        } else {
            self.iteration_factor.saturating_mul(task_count).max(1)
        }
    }

    /// The configured "today", or the local date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = EngineOptions::default();
        assert_eq!(o.iteration_factor, 2);
        assert_eq!(o.advance_limit_days, 365);
        assert_eq!(o.handoff_gap_days, 3);
        assert_eq!(o.deadline_check, DeadlineCheck::LatenessAndMargin);
        assert!((o.sprint_utilization - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_iteration_cap() {
        let o = EngineOptions::new();
        assert_eq!(o.iteration_cap(0), 0);
        assert_eq!(o.iteration_cap(5), 10);
        assert_eq!(o.clone().with_iteration_factor(0).iteration_cap(5), 1);
        assert_eq!(o.with_iteration_factor(4).iteration_cap(3), 12);
    }

    #[test]
    fn test_today_override() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(EngineOptions::new().with_today(day).today(), day);
    }

    #[test]
    fn test_partial_json() {
        let o: EngineOptions =
            serde_json::from_str(r#"{"iteration_factor":4,"deadline_check":"off"}"#).unwrap();
        assert_eq!(o.iteration_factor, 4);
        assert_eq!(o.deadline_check, DeadlineCheck::Off);
        assert_eq!(o.default_gap_days, 1);
    }
}
