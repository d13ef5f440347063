//! Team capacity statistics.
//!
//! Counts project-wide working days in `[project start, effective deadline]`
//! and, per member, removes personal days off that fall inside the window on
//! otherwise working days (a day off on a holiday or weekend costs nothing).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Working days | Days in window not excluded by holidays/weekends |
//! | Calendar days | `deadline - start + 1` |
//! | Effective days | `max(0, working days - own working days off)` |
//! | Member capacity | `hours per day × effective days` |
//! | Team capacity | Sum of member capacities |

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates;
use crate::models::{CalendarContext, ProjectConfig, TeamMember, WorkCalendar};

/// Capacity of one team member over the project window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCapacity {
    pub name: String,
    pub capacity_per_day: f64,
    /// Hours available over the window.
    pub total_capacity: f64,
    pub sector: String,
    /// Working days left after personal days off.
    pub effective_days: u32,
}

/// Capacity of the whole team over the project window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityStats {
    pub working_days: u32,
    pub calendar_days: i64,
    /// Sum of member capacities (hours).
    pub total_team_capacity: f64,
    pub member_stats: Vec<MemberCapacity>,
}

impl CapacityStats {
    /// Computes capacity over the inclusive window `[start, end]`.
    pub fn calculate(config: &ProjectConfig, start: NaiveDate, end: NaiveDate) -> Self {
        let calendar = WorkCalendar::new(config);
        let global = CalendarContext::global();

        let working_days = calendar.working_days_between(start, end, &global);
        let calendar_days = (dates::days_between(start, end) + 1).max(0);

        let member_stats: Vec<MemberCapacity> = config
            .team_members
            .iter()
            .map(|m| {
                let lost = lost_days(&calendar, m, start, end);
                let effective_days = working_days.saturating_sub(lost);
                MemberCapacity {
                    name: m.name.clone(),
                    capacity_per_day: m.capacity,
                    total_capacity: m.capacity * f64::from(effective_days),
                    sector: m.sector.clone(),
                    effective_days,
                }
            })
            .collect();

        let total_team_capacity = member_stats.iter().map(|m| m.total_capacity).sum();

        Self {
            working_days,
            calendar_days,
            total_team_capacity,
            member_stats,
        }
    }

    /// Stats for one member by name.
    pub fn member(&self, name: &str) -> Option<&MemberCapacity> {
        self.member_stats.iter().find(|m| m.name == name)
    }
}

/// Distinct personal days off inside the window that are working days for
/// everyone else.
fn lost_days(calendar: &WorkCalendar<'_>, member: &TeamMember, start: NaiveDate, end: NaiveDate) -> u32 {
    let global = CalendarContext::global();
    member
        .parsed_days_off()
        .filter(|d| *d >= start && *d <= end)
        .filter(|d| calendar.is_working_day(*d, &global))
        .collect::<BTreeSet<_>>()
        .len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_working_days_and_capacity() {
        let cfg = ProjectConfig::new("2024-01-01")
            .with_holiday("2024-01-01")
            .with_member(TeamMember::new("Ana").with_capacity(6.0))
            .with_member(TeamMember::new("Rui"));

        let stats = CapacityStats::calculate(&cfg, d(2024, 1, 1), d(2024, 1, 14));
        assert_eq!(stats.working_days, 9);
        assert_eq!(stats.calendar_days, 14);
        assert!((stats.member("Ana").unwrap().total_capacity - 54.0).abs() < 1e-10);
        assert!((stats.member("Rui").unwrap().total_capacity - 72.0).abs() < 1e-10);
        assert!((stats.total_team_capacity - 126.0).abs() < 1e-10);
    }

    #[test]
    fn test_day_off_on_non_working_day_is_free() {
        let cfg = ProjectConfig::new("2024-01-01")
            .with_holiday("2024-01-01")
            .with_member(
                TeamMember::new("Ana")
                    .with_day_off("2024-01-01") // holiday
                    .with_day_off("2024-01-06") // Saturday
                    .with_day_off("2024-01-03") // counts
                    .with_day_off("2024-01-03") // duplicate
                    .with_day_off("2024-02-01"), // outside window
            );

        let stats = CapacityStats::calculate(&cfg, d(2024, 1, 1), d(2024, 1, 14));
        assert_eq!(stats.member("Ana").unwrap().effective_days, 8);
    }

    #[test]
    fn test_effective_days_never_negative() {
        let mut member = TeamMember::new("Ana");
        for day in 1..=5 {
            member.days_off.push(format!("2024-01-0{day}"));
        }
        let cfg = ProjectConfig::new("2024-01-01").with_member(member);

        let stats = CapacityStats::calculate(&cfg, d(2024, 1, 1), d(2024, 1, 3));
        assert_eq!(stats.working_days, 3);
        assert_eq!(stats.member("Ana").unwrap().effective_days, 0);
        assert!((stats.total_team_capacity - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_inverted_window() {
        let cfg = ProjectConfig::new("2024-01-01").with_member(TeamMember::new("Ana"));
        let stats = CapacityStats::calculate(&cfg, d(2024, 1, 10), d(2024, 1, 1));
        assert_eq!(stats.working_days, 0);
        assert_eq!(stats.calendar_days, 0);
        assert_eq!(stats.member("Ana").unwrap().effective_days, 0);
    }
}
