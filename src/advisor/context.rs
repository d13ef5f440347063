//! Sprint/person grouping passed to advisory rules.

use crate::models::{ProjectConfig, Schedule, ScheduledTask, Sprint, Squad};
use crate::scheduler::EngineOptions;

/// One person's non-completed tasks in one sprint, ordered by start date.
#[derive(Debug, Clone)]
pub struct PersonLane<'a> {
    pub person: &'a str,
    pub tasks: Vec<&'a ScheduledTask>,
}

impl PersonLane<'_> {
    /// Total effort (hours) in the lane.
    pub fn effort(&self) -> f64 {
        self.tasks.iter().map(|t| t.task.effort_hours()).sum()
    }
}

/// A sprint with its owning squad and per-person lanes.
#[derive(Debug, Clone)]
pub struct SprintGroup<'a> {
    pub sprint: &'a Sprint,
    pub squad: &'a Squad,
    /// Lanes in order of first appearance in the schedule.
    pub lanes: Vec<PersonLane<'a>>,
}

/// Read-only view the advisory rules evaluate.
#[derive(Debug, Clone)]
pub struct AdvisorContext<'a> {
    pub schedule: &'a Schedule,
    pub config: &'a ProjectConfig,
    pub options: &'a EngineOptions,
    /// Sprints in squad order, each with at least one assigned task.
    pub groups: Vec<SprintGroup<'a>>,
}

impl<'a> AdvisorContext<'a> {
    /// Groups non-completed, assigned tasks by sprint and then by person.
    ///
    /// Within a lane tasks are ordered by computed start; ties keep
    /// schedule order.
    pub fn build(schedule: &'a Schedule, config: &'a ProjectConfig, options: &'a EngineOptions) -> Self {
        let mut groups = Vec::new();

        for (sprint, squad) in config.all_sprints() {
            let mut lanes: Vec<PersonLane<'a>> = Vec::new();

            for t in schedule
                .active()
                .filter(|t| t.task.sprint() == Some(sprint.id.as_str()))
            {
                let Some(person) = t.task.responsible_name() else {
                    continue;
                };
                match lanes.iter_mut().find(|l| l.person == person) {
                    Some(lane) => lane.tasks.push(t),
                    None => lanes.push(PersonLane {
                        person,
                        tasks: vec![t],
                    }),
                }
            }

            if lanes.is_empty() {
                continue;
            }
            for lane in &mut lanes {
                lane.tasks.sort_by_key(|t| t.start_date);
            }
            groups.push(SprintGroup {
                sprint,
                squad,
                lanes,
            });
        }

        Self {
            schedule,
            config,
            options,
            groups,
        }
    }

    /// Daily capacity of a person, defaulting for people not on the roster.
    pub fn capacity_of(&self, person: &str) -> f64 {
        self.config
            .member(person)
            .map_or(self.options.default_capacity_hours, |m| m.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::scheduler::Propagator;

    #[test]
    fn test_grouping() {
        let config = ProjectConfig::new("2024-01-01").with_squad(
            Squad::new("sq")
                .with_sprint(Sprint::new("s1", "2024-01-01", "2024-01-12"))
                .with_sprint(Sprint::new("s2", "2024-01-15", "2024-01-26")),
        );
        let tasks = vec![
            Task::new("late").with_sprint("s1").with_responsible("Ana").with_manual_start("2024-01-05"),
            Task::new("early").with_sprint("s1").with_responsible("Ana"),
            Task::new("rui").with_sprint("s1").with_responsible("Rui"),
            Task::new("nobody").with_sprint("s1"),
            Task::new("done").with_sprint("s1").with_responsible("Ana").completed_on("2024-01-02"),
        ];
        let schedule = Propagator::new().propagate(&tasks, &config);
        let options = EngineOptions::default();
        let ctx = AdvisorContext::build(&schedule, &config, &options);

        assert_eq!(ctx.groups.len(), 1);
        let group = &ctx.groups[0];
        assert_eq!(group.sprint.id, "s1");
        assert_eq!(group.lanes.len(), 2);
        assert_eq!(group.lanes[0].person, "Ana");
        let ids: Vec<_> = group.lanes[0].tasks.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert!((ctx.capacity_of("Ghost") - 8.0).abs() < 1e-10);
    }
}
