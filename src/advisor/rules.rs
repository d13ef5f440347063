//! Built-in advisory rules.
//!
//! - **GoalFirst**: a person's goals should precede their items in a sprint
//! - **RankOrder**: same-type tasks should follow their classification rank
//! - **SprintCapacity**: a person's sprint effort should fit the sprint budget

use super::{AdvisorContext, AdvisoryRule, Suggestion, SuggestionKind};
use crate::models::{ScheduledTask, UsType};

fn label(t: &ScheduledTask) -> &str {
    if t.task.name.is_empty() {
        t.id()
    } else {
        &t.task.name
    }
}

/// Goals before items.
///
/// If a person's first goal in a sprint is not their first task, every
/// item scheduled before it is flagged.
#[derive(Debug, Clone, Copy)]
pub struct GoalFirst;

impl AdvisoryRule for GoalFirst {
    fn name(&self) -> &'static str {
        "GOAL_FIRST"
    }

    fn evaluate(&self, ctx: &AdvisorContext<'_>) -> Vec<Suggestion> {
        let mut out = Vec::new();
        for group in &ctx.groups {
            for lane in &group.lanes {
                let Some(first_goal) = lane.tasks.iter().position(|t| t.task.is_goal()) else {
                    continue;
                };
                let goal = lane.tasks[first_goal];
                for item in &lane.tasks[..first_goal] {
                    out.push(
                        Suggestion::new(
                            SuggestionKind::PriorityOrder,
                            format!(
                                "PRIORITY: \"{}\" ({}, {}) should come after goal \"{}\".",
                                label(item),
                                lane.person,
                                group.sprint.label(),
                                label(goal)
                            ),
                        )
                        .for_task(item.id())
                        .in_sprint(&group.sprint.id)
                        .for_person(lane.person),
                    );
                }
            }
        }
        out
    }

    fn description(&self) -> &'static str {
        "Goals are scheduled before items"
    }
}

/// Classification rank order.
///
/// Among one person's tasks of the same type in a sprint, taken in start
/// order, a task ranked lower than the one before it is flagged. Unranked
/// tasks are never compared.
#[derive(Debug, Clone, Copy)]
pub struct RankOrder;

impl AdvisoryRule for RankOrder {
    fn name(&self) -> &'static str {
        "RANK_ORDER"
    }

    fn evaluate(&self, ctx: &AdvisorContext<'_>) -> Vec<Suggestion> {
        let mut out = Vec::new();
        for group in &ctx.groups {
            for lane in &group.lanes {
                for us_type in [UsType::Goal, UsType::Item] {
                    let same: Vec<&ScheduledTask> = lane
                        .tasks
                        .iter()
                        .copied()
                        .filter(|t| t.task.us_type == us_type)
                        .collect();

                    for pair in same.windows(2) {
                        let (earlier, later) = (pair[0], pair[1]);
                        let (Some(r_earlier), Some(r_later)) =
                            (earlier.task.classification, later.task.classification)
                        else {
                            continue;
                        };
                        if r_later < r_earlier {
                            out.push(
                                Suggestion::new(
                                    SuggestionKind::RankOrder,
                                    format!(
                                        "SEQUENCE: \"{}\" (rank {r_later}) is scheduled after \"{}\" (rank {r_earlier}) for {} in {}; swap them.",
                                        label(later),
                                        label(earlier),
                                        lane.person,
                                        group.sprint.label()
                                    ),
                                )
                                .for_task(later.id())
                                .in_sprint(&group.sprint.id)
                                .for_person(lane.person),
                            );
                        }
                    }
                }
            }
        }
        out
    }

    fn description(&self) -> &'static str {
        "Same-type tasks follow their classification rank"
    }
}

/// Sprint load per person.
///
/// Budget = sprint calendar days × daily capacity × utilization. An
/// overloaded person gets a suggestion to move their lowest-priority item;
/// if they only hold goals the goals themselves are at risk.
#[derive(Debug, Clone, Copy)]
pub struct SprintCapacity;

impl AdvisoryRule for SprintCapacity {
    fn name(&self) -> &'static str {
        "SPRINT_CAPACITY"
    }

    fn evaluate(&self, ctx: &AdvisorContext<'_>) -> Vec<Suggestion> {
        let mut out = Vec::new();
        for group in &ctx.groups {
            let days = group.sprint.calendar_days() as f64;
            for lane in &group.lanes {
                let budget = days * ctx.capacity_of(lane.person) * ctx.options.sprint_utilization;
                let used = lane.effort();
                if used <= budget {
                    continue;
                }

                // Highest rank (unranked last of all), latest start on ties.
                let movable = lane
                    .tasks
                    .iter()
                    .filter(|t| !t.task.is_goal())
                    .max_by_key(|t| (t.task.classification.unwrap_or(u32::MAX), t.start_date));

                let suggestion = match movable {
                    Some(task) => Suggestion::new(
                        SuggestionKind::Overload,
                        format!(
                            "OVERLOAD: {} has {used:.1}h planned in {} against {budget:.1}h available. Move \"{}\" to a later sprint.",
                            lane.person,
                            group.sprint.label(),
                            label(task)
                        ),
                    )
                    .for_task(task.id()),
                    None => Suggestion::new(
                        SuggestionKind::GoalsAtRisk,
                        format!(
                            "CRITICAL: {} has {used:.1}h of goals in {} against {budget:.1}h available; goals will not be delivered.",
                            lane.person,
                            group.sprint.label()
                        ),
                    ),
                };
                out.push(
                    suggestion
                        .in_sprint(&group.sprint.id)
                        .for_person(lane.person),
                );
            }
        }
        out
    }

    fn description(&self) -> &'static str {
        "Sprint effort fits the usable share of the person's capacity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectConfig, Schedule, Sprint, Squad, Task, TeamMember};
    use crate::scheduler::{EngineOptions, Propagator};

    fn config() -> ProjectConfig {
        ProjectConfig::new("2024-01-01")
            .with_member(TeamMember::new("Ana"))
            .with_squad(
                Squad::new("sq").with_sprint(
                    Sprint::new("s1", "2024-01-01", "2024-01-05").with_name("Sprint 1"),
                ),
            )
    }

    fn run<R: AdvisoryRule>(rule: R, tasks: &[Task]) -> Vec<Suggestion> {
        let cfg = config();
        let schedule: Schedule = Propagator::new().propagate(tasks, &cfg);
        let options = EngineOptions::default();
        let ctx = AdvisorContext::build(&schedule, &cfg, &options);
        rule.evaluate(&ctx)
    }

    fn ana(id: &str) -> Task {
        Task::new(id).with_sprint("s1").with_responsible("Ana")
    }

    #[test]
    fn test_goal_first_flags_leading_items() {
        let tasks = vec![
            ana("i1").with_manual_start("2024-01-01"),
            ana("i2").with_manual_start("2024-01-02"),
            ana("g").with_us_type(UsType::Goal).with_manual_start("2024-01-03"),
            ana("i3").with_manual_start("2024-01-04"),
        ];
        let out = run(GoalFirst, &tasks);
        let ids: Vec<_> = out.iter().map(|s| s.task_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
        assert!(out[0].message.contains("should come after goal \"g\""));
    }

    #[test]
    fn test_goal_first_quiet_when_goal_leads() {
        let tasks = vec![
            ana("g").with_us_type(UsType::Goal).with_manual_start("2024-01-01"),
            ana("i").with_manual_start("2024-01-02"),
        ];
        assert!(run(GoalFirst, &tasks).is_empty());
        assert!(run(GoalFirst, &[ana("i")]).is_empty());
    }

    #[test]
    fn test_rank_order() {
        let tasks = vec![
            ana("a").with_classification(2).with_manual_start("2024-01-01"),
            ana("b").with_classification(1).with_manual_start("2024-01-02"),
            ana("c").with_manual_start("2024-01-03"),
            ana("d").with_classification(3).with_manual_start("2024-01-04"),
        ];
        let out = run(RankOrder, &tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SuggestionKind::RankOrder);
        assert_eq!(out[0].task_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_rank_order_compares_same_type_only() {
        let tasks = vec![
            ana("g").with_us_type(UsType::Goal).with_classification(5).with_manual_start("2024-01-01"),
            ana("i").with_classification(1).with_manual_start("2024-01-02"),
        ];
        assert!(run(RankOrder, &tasks).is_empty());
    }

    #[test]
    fn test_sprint_overload_moves_item() {
        // Budget: 5 days × 8h × 0.7 = 28h.
        let tasks = vec![
            ana("g").with_us_type(UsType::Goal).with_effort(16.0),
            ana("i1").with_effort(8.0).with_classification(1),
            ana("i2").with_effort(8.0).with_classification(4),
        ];
        let out = run(SprintCapacity, &tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SuggestionKind::Overload);
        assert_eq!(out[0].task_id.as_deref(), Some("i2"));
        assert!(out[0].message.contains("32.0h planned in Sprint 1 against 28.0h"));
    }

    #[test]
    fn test_sprint_overload_goals_only() {
        let tasks = vec![ana("g").with_us_type(UsType::Goal).with_effort(40.0)];
        let out = run(SprintCapacity, &tasks);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SuggestionKind::GoalsAtRisk);
        assert!(out[0].task_id.is_none());
        assert_eq!(out[0].person.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_sprint_within_budget() {
        let tasks = vec![ana("i").with_effort(27.5)];
        assert!(run(SprintCapacity, &tasks).is_empty());
    }
}
