//! Critical path extraction.
//!
//! # Algorithm
//! 1. Find the latest end date among non-completed tasks.
//! 2. Every non-completed task ending on that date is a path tip.
//! 3. Walk each tip's dependency chain back to a task without a
//!    predecessor, collecting every visited id.
//!
//! The walk is iterative with a seen-set, so dependency cycles and shared
//! ancestors terminate. Dangling dependency ids end the chain and are not
//! reported.

use std::collections::HashSet;

use crate::models::Schedule;

/// Returns the ids of tasks on the critical path.
///
/// Ids are listed tip by tip (in schedule order), each tip followed by its
/// ancestors. Empty when there are no non-completed tasks.
pub fn critical_path(schedule: &Schedule) -> Vec<String> {
    let Some(max_end) = schedule.active_end() else {
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut path = Vec::new();

    for tip in schedule.active().filter(|t| t.end_date == max_end) {
        let mut current = Some(tip);
        while let Some(task) = current {
            if !seen.insert(task.id()) {
                break;
            }
            path.push(task.id().to_string());
            current = task.task.dependency().and_then(|dep| schedule.get(dep));
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectConfig, Task};
    use crate::scheduler::Propagator;

    fn schedule(tasks: &[Task]) -> Schedule {
        Propagator::new().propagate(tasks, &ProjectConfig::new("2024-01-01"))
    }

    #[test]
    fn test_chain_is_critical() {
        let s = schedule(&[
            Task::new("A").with_duration(2),
            Task::new("B").with_duration(3).with_dependency("A"),
            Task::new("C").with_duration(1),
        ]);
        assert_eq!(critical_path(&s), vec!["B", "A"]);
    }

    #[test]
    fn test_multiple_tips() {
        let s = schedule(&[
            Task::new("A").with_duration(3),
            Task::new("B").with_duration(3),
        ]);
        assert_eq!(critical_path(&s), vec!["A", "B"]);
    }

    #[test]
    fn test_completed_tasks_are_not_tips() {
        let s = schedule(&[
            Task::new("A").with_duration(10).completed_on("2024-01-12"),
            Task::new("B").with_duration(2),
        ]);
        assert_eq!(critical_path(&s), vec!["B"]);
    }

    #[test]
    fn test_completed_ancestor_still_traced() {
        let s = schedule(&[
            Task::new("A").with_duration(2).completed_on("2024-01-02"),
            Task::new("B").with_duration(2).with_dependency("A"),
        ]);
        assert_eq!(critical_path(&s), vec!["B", "A"]);
    }

    #[test]
    fn test_all_completed_is_empty() {
        let s = schedule(&[Task::new("A").completed_on("2024-01-01")]);
        assert!(critical_path(&s).is_empty());
        assert!(critical_path(&schedule(&[])).is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let s = schedule(&[
            Task::new("A").with_duration(1).with_dependency("B"),
            Task::new("B").with_duration(1).with_dependency("A"),
        ]);
        let path = critical_path(&s);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_dangling_dependency_not_reported() {
        let s = schedule(&[Task::new("A").with_duration(1).with_dependency("ghost")]);
        assert_eq!(critical_path(&s), vec!["A"]);
    }
}
