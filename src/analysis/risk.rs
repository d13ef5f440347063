//! Automatic risk detection.
//!
//! Evaluated per non-completed task, in schedule order, followed by the
//! aggregate checks. Each risk carries a kind for programmatic filtering and
//! a free-text message for display.
//!
//! # Checks
//!
//! | Kind | Fires when |
//! |------|-----------|
//! | Capacity | effort > duration × daily capacity (non-milestones) |
//! | SprintEarlyStart | task starts before its sprint |
//! | SprintOverrun | task ends after its sprint |
//! | HolidayCollision | short task spans a holiday of its calendar |
//! | DayOffCollision | short task spans a day off of its responsible person |
//! | CarryOver | unplanned share of active effort > threshold |
//! | DeadlineMissed | latest active end > manual deadline |
//! | LowMargin | 0 ≤ margin to manual deadline < threshold |

use serde::Serialize;

use crate::dates;
use crate::models::{CalendarContext, ProjectConfig, Schedule, ScheduledTask, WorkCalendar};
use crate::scheduler::{DeadlineCheck, EngineOptions};

/// Risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskKind {
    Capacity,
    SprintEarlyStart,
    SprintOverrun,
    HolidayCollision,
    DayOffCollision,
    CarryOver,
    DeadlineMissed,
    LowMargin,
}

/// A detected risk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub kind: RiskKind,
    /// Task the risk is about; `None` for aggregate risks.
    pub task_id: Option<String>,
    pub message: String,
}

impl Risk {
    fn task(kind: RiskKind, task: &ScheduledTask, message: String) -> Self {
        Self {
            kind,
            task_id: Some(task.id().to_string()),
            message,
        }
    }

    fn aggregate(kind: RiskKind, message: String) -> Self {
        Self {
            kind,
            task_id: None,
            message,
        }
    }
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Runs the risk checks over a propagated schedule.
#[derive(Debug, Clone, Default)]
pub struct RiskDetector {
    options: EngineOptions,
}

impl RiskDetector {
    /// Creates a detector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with the given options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// All risks, task checks first, then aggregates.
    pub fn detect(&self, schedule: &Schedule, config: &ProjectConfig) -> Vec<Risk> {
        let mut risks = Vec::new();
        let calendar = WorkCalendar::new(config);

        for task in schedule.active() {
            self.check_capacity(task, config, &mut risks);
            self.check_sprint(task, config, &mut risks);
            self.check_calendar(task, config, &calendar, &mut risks);
        }

        self.check_carry_over(schedule, &mut risks);
        self.check_deadline(schedule, config, &mut risks);

        risks
    }

    /// Messages only, in detection order.
    pub fn messages(&self, schedule: &Schedule, config: &ProjectConfig) -> Vec<String> {
        self.detect(schedule, config)
            .into_iter()
            .map(|r| r.message)
            .collect()
    }

    fn check_capacity(&self, t: &ScheduledTask, config: &ProjectConfig, risks: &mut Vec<Risk>) {
        let task = &t.task;
        if task.is_milestone || task.duration == 0 {
            return;
        }
        let effort = task.effort_hours();
        if effort <= 0.0 {
            return;
        }

        let per_day = task
            .responsible_name()
            .and_then(|name| config.member(name))
            .map_or(self.options.default_capacity_hours, |m| m.capacity);
        let limit = f64::from(task.duration) * per_day;

        if effort > limit {
            risks.push(Risk::task(
                RiskKind::Capacity,
                t,
                format!("CAPACITY: \"{}\" requires {effort}h. Limit: {limit}h.", label(t)),
            ));
        }
    }

    fn check_sprint(&self, t: &ScheduledTask, config: &ProjectConfig, risks: &mut Vec<Risk>) {
        let Some((sprint, _)) = t.task.sprint().and_then(|id| config.find_sprint(id)) else {
            return;
        };

        if let Some(sprint_start) = sprint.start() {
            if t.start_date < sprint_start {
                risks.push(Risk::task(
                    RiskKind::SprintEarlyStart,
                    t,
                    format!("SPRINT: \"{}\" starts before {}.", label(t), sprint.label()),
                ));
            }
        }

        if let Some(sprint_end) = sprint.end() {
            if t.end_date > sprint_end {
                let over = dates::days_between(sprint_end, t.end_date);
                risks.push(Risk::task(
                    RiskKind::SprintOverrun,
                    t,
                    format!(
                        "SPRINT: \"{}\" overruns {} by {over} day(s).",
                        label(t),
                        sprint.label()
                    ),
                ));
            }
        }
    }

    fn check_calendar(
        &self,
        t: &ScheduledTask,
        config: &ProjectConfig,
        calendar: &WorkCalendar<'_>,
        risks: &mut Vec<Risk>,
    ) {
        let task = &t.task;
        if task.is_milestone || task.duration >= self.options.short_task_days {
            return;
        }

        let squad = task
            .sprint()
            .and_then(|id| config.find_sprint(id))
            .map(|(_, squad)| squad);
        let ctx = CalendarContext::global().in_squad(squad);

        let hits_holiday = calendar
            .holidays(&ctx)
            .iter()
            .filter_map(|h| dates::parse_iso(h))
            .any(|h| t.spans(h));
        if hits_holiday {
            risks.push(Risk::task(
                RiskKind::HolidayCollision,
                t,
                format!("CALENDAR: Short task \"{}\" is interrupted by a holiday.", label(t)),
            ));
        }

        if let Some(member) = task.responsible_name().and_then(|n| config.member(n)) {
            if member.parsed_days_off().any(|d| t.spans(d)) {
                risks.push(Risk::task(
                    RiskKind::DayOffCollision,
                    t,
                    format!(
                        "CALENDAR: Short task \"{}\" overlaps a day off of {}.",
                        label(t),
                        member.name
                    ),
                ));
            }
        }
    }

    fn check_carry_over(&self, schedule: &Schedule, risks: &mut Vec<Risk>) {
        let (unplanned, total) = schedule.active().fold((0.0, 0.0), |(u, tot), t| {
            let effort = t.task.effort_hours();
            let u = if t.task.is_unplanned() { u + effort } else { u };
            (u, tot + effort)
        });

        if total > 0.0 && unplanned / total > self.options.carry_over_threshold {
            let pct = (unplanned / total * 100.0).round();
            risks.push(Risk::aggregate(
                RiskKind::CarryOver,
                format!("CARRY-OVER: {pct}% of effort is not planned."),
            ));
        }
    }

    fn check_deadline(&self, schedule: &Schedule, config: &ProjectConfig, risks: &mut Vec<Risk>) {
        if self.options.deadline_check == DeadlineCheck::Off {
            return;
        }
        let (Some(deadline), Some(last_end)) = (config.manual_deadline(), schedule.active_end())
        else {
            return;
        };

        if last_end > deadline {
            let late = dates::days_between(deadline, last_end);
            risks.push(Risk::aggregate(
                RiskKind::DeadlineMissed,
                format!("CRITICAL: The project will finish {late} day(s) after the deadline!"),
            ));
        } else if self.options.deadline_check == DeadlineCheck::LatenessAndMargin {
            let margin = dates::days_between(last_end, deadline);
            if margin < self.options.low_margin_days {
                risks.push(Risk::aggregate(
                    RiskKind::LowMargin,
                    format!("WARNING: Low safety margin ({margin} day(s) until the deadline)."),
                ));
            }
        }
    }
}

fn label(t: &ScheduledTask) -> &str {
    if t.task.name.is_empty() {
        t.id()
    } else {
        &t.task.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sprint, Squad, Task, TeamMember};
    use crate::scheduler::Propagator;

    fn detect(tasks: &[Task], config: &ProjectConfig) -> Vec<Risk> {
        let schedule = Propagator::new().propagate(tasks, config);
        RiskDetector::new().detect(&schedule, config)
    }

    fn kinds(risks: &[Risk]) -> Vec<RiskKind> {
        risks.iter().map(|r| r.kind).collect()
    }

    fn sprint_config() -> ProjectConfig {
        ProjectConfig::new("2024-01-01").with_squad(
            Squad::new("sq").with_sprint(Sprint::new("s1", "2024-01-01", "2024-01-05").with_name("Sprint 1")),
        )
    }

    #[test]
    fn test_capacity_risk() {
        let cfg = sprint_config().with_member(TeamMember::new("Ana").with_capacity(8.0));
        let tasks = vec![Task::new("T")
            .with_name("Build API")
            .with_duration(2)
            .with_effort(40.0)
            .with_responsible("Ana")
            .with_sprint("s1")];
        let risks = detect(&tasks, &cfg);
        assert_eq!(kinds(&risks), vec![RiskKind::Capacity]);
        assert_eq!(risks[0].message, "CAPACITY: \"Build API\" requires 40h. Limit: 16h.");
        assert_eq!(risks[0].task_id.as_deref(), Some("T"));
    }

    #[test]
    fn test_capacity_uses_member_rate() {
        let cfg = sprint_config().with_member(TeamMember::new("Ana").with_capacity(4.0));
        let tasks = vec![Task::new("T")
            .with_duration(2)
            .with_effort(10.0)
            .with_responsible("Ana")
            .with_sprint("s1")];
        assert_eq!(kinds(&detect(&tasks, &cfg)), vec![RiskKind::Capacity]);

        // Unassigned defaults to 8h/day: 10h < 16h.
        let tasks = vec![Task::new("T").with_duration(2).with_effort(10.0).with_sprint("s1")];
        assert!(detect(&tasks, &cfg).is_empty());
    }

    #[test]
    fn test_milestone_and_completed_skip_capacity() {
        let cfg = sprint_config();
        let tasks = vec![
            Task::milestone("M").with_effort(100.0).with_sprint("s1"),
            Task::new("D")
                .with_duration(1)
                .with_effort(100.0)
                .with_sprint("s1")
                .completed_on("2024-01-01"),
        ];
        assert!(detect(&tasks, &cfg).is_empty());
    }

    #[test]
    fn test_sprint_overrun() {
        let cfg = sprint_config();
        let tasks = vec![Task::new("T").with_name("Long").with_duration(7).with_sprint("s1")];
        let risks = detect(&tasks, &cfg);
        // Jan 1 + 7 working days = Jan 9, sprint ends Jan 5.
        assert_eq!(kinds(&risks), vec![RiskKind::SprintOverrun]);
        assert_eq!(risks[0].message, "SPRINT: \"Long\" overruns Sprint 1 by 4 day(s).");
    }

    #[test]
    fn test_sprint_early_start() {
        let cfg = sprint_config();
        let tasks = vec![Task::new("T")
            .with_duration(1)
            .with_sprint("s1")
            .with_manual_start("2023-12-29")];
        assert_eq!(kinds(&detect(&tasks, &cfg)), vec![RiskKind::SprintEarlyStart]);
    }

    #[test]
    fn test_holiday_collision_for_short_task() {
        let cfg = ProjectConfig::new("2024-01-01").with_holiday("2024-01-02");
        let tasks = vec![
            Task::new("short").with_duration(2).with_sprint("x"),
            Task::new("long").with_duration(3),
        ];
        let schedule = Propagator::new().propagate(&tasks, &cfg);
        let risks = RiskDetector::new().detect(&schedule, &cfg);
        // short: Jan 1 + Jan 3 spans the Jan 2 holiday; long is not short.
        assert!(risks
            .iter()
            .any(|r| r.kind == RiskKind::HolidayCollision && r.task_id.as_deref() == Some("short")));
        assert!(!risks
            .iter()
            .any(|r| r.kind == RiskKind::HolidayCollision && r.task_id.as_deref() == Some("long")));
    }

    #[test]
    fn test_squad_holidays_replace_global_for_collision() {
        let cfg = ProjectConfig::new("2024-01-01")
            .with_holiday("2024-01-02")
            .with_squad(Squad::new("sq").with_sprint(Sprint::new("s1", "2024-01-01", "2024-01-31")));
        let tasks = vec![Task::new("T").with_duration(2).with_sprint("s1")];
        let risks = detect(&tasks, &cfg);
        assert!(!risks.iter().any(|r| r.kind == RiskKind::HolidayCollision));
    }

    #[test]
    fn test_day_off_collision() {
        let cfg = sprint_config().with_member(TeamMember::new("Ana").with_day_off("2024-01-02"));
        let tasks = vec![Task::new("T")
            .with_duration(2)
            .with_responsible("Ana")
            .with_sprint("s1")];
        let risks = detect(&tasks, &cfg);
        assert_eq!(kinds(&risks), vec![RiskKind::DayOffCollision]);
        assert!(risks[0].message.contains("day off of Ana"));
    }

    #[test]
    fn test_carry_over() {
        let cfg = sprint_config();
        let tasks = vec![
            Task::new("A").with_duration(1).with_effort(6.0).with_sprint("s1"),
            Task::new("B").with_duration(1).with_effort(4.0),
        ];
        let risks = detect(&tasks, &cfg);
        assert_eq!(kinds(&risks), vec![RiskKind::CarryOver]);
        assert_eq!(risks[0].message, "CARRY-OVER: 40% of effort is not planned.");
        assert!(risks[0].task_id.is_none());
    }

    #[test]
    fn test_carry_over_at_threshold_is_quiet() {
        let cfg = sprint_config();
        let tasks = vec![
            Task::new("A").with_duration(1).with_effort(8.0).with_sprint("s1"),
            Task::new("B").with_duration(1).with_effort(2.0),
        ];
        assert!(detect(&tasks, &cfg).is_empty());
    }

    #[test]
    fn test_deadline_missed() {
        let cfg = sprint_config().with_deadline("2024-01-03");
        let tasks = vec![Task::new("A").with_duration(5).with_sprint("s1")];
        let risks = detect(&tasks, &cfg);
        assert_eq!(kinds(&risks), vec![RiskKind::DeadlineMissed]);
        assert_eq!(
            risks[0].message,
            "CRITICAL: The project will finish 2 day(s) after the deadline!"
        );
    }

    #[test]
    fn test_low_margin_is_optional() {
        let cfg = sprint_config().with_deadline("2024-01-06");
        let tasks = vec![Task::new("A").with_duration(5).with_sprint("s1")];
        let schedule = Propagator::new().propagate(&tasks, &cfg);

        let risks = RiskDetector::new().detect(&schedule, &cfg);
        assert_eq!(kinds(&risks), vec![RiskKind::LowMargin]);

        let lateness_only = EngineOptions::new().with_deadline_check(DeadlineCheck::LatenessOnly);
        assert!(RiskDetector::with_options(lateness_only)
            .detect(&schedule, &cfg)
            .is_empty());
    }

    #[test]
    fn test_order_tasks_then_aggregates() {
        let cfg = sprint_config().with_deadline("2024-01-02");
        let tasks = vec![
            Task::new("A").with_duration(1).with_effort(20.0),
            Task::new("B").with_duration(5).with_sprint("s1"),
        ];
        let risks = detect(&tasks, &cfg);
        assert_eq!(
            kinds(&risks),
            vec![RiskKind::Capacity, RiskKind::CarryOver, RiskKind::DeadlineMissed]
        );
    }
}
