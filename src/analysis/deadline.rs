//! Project end and deadline resolution.
//!
//! The suggested end is the latest of every sprint end and every task end,
//! floored at the project start. The effective deadline is the later of the
//! suggested end and the manual deadline, plus a fixed buffer; it bounds the
//! capacity window.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::models::{ProjectConfig, Schedule};

/// Resolved end dates of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineInfo {
    /// Latest sprint or task end (at least the project start).
    pub suggested_end: NaiveDate,
    /// Manual deadline, if set and readable.
    pub manual_deadline: Option<NaiveDate>,
    /// `max(suggested_end, manual_deadline) + buffer`.
    pub effective_deadline: NaiveDate,
}

impl DeadlineInfo {
    /// Resolves deadlines from a schedule and its configuration.
    pub fn resolve(schedule: &Schedule, config: &ProjectConfig, buffer_days: i64) -> Self {
        let suggested_end = suggested_end_date(schedule, config);
        let manual_deadline = config.manual_deadline();
        let limit = manual_deadline.map_or(suggested_end, |m| m.max(suggested_end));
        Self {
            suggested_end,
            manual_deadline,
            effective_deadline: dates::add_days(limit, buffer_days),
        }
    }
}

/// Latest of all sprint ends and task ends, never before the project start.
pub fn suggested_end_date(schedule: &Schedule, config: &ProjectConfig) -> NaiveDate {
    let sprint_ends = config.all_sprints().filter_map(|(sprint, _)| sprint.end());
    let task_ends = schedule.iter().map(|t| t.end_date);

    sprint_ends
        .chain(task_ends)
        .fold(schedule.project_start, NaiveDate::max)
}
