//! Sequencing advisor for sprint plans.
//!
//! Advisory rules inspect an already propagated [`Schedule`](crate::models::Schedule)
//! grouped by sprint and person, and emit free-text suggestions. Rules never
//! mutate the schedule.
//!
//! # Usage
//!
//! ```
//! use u_gantt::advisor::{rules, Advisor};
//! use u_gantt::models::ProjectConfig;
//! use u_gantt::scheduler::Propagator;
//!
//! let config = ProjectConfig::new("2024-01-01");
//! let schedule = Propagator::new().propagate(&[], &config);
//!
//! let advisor = Advisor::new()
//!     .with_rule(rules::GoalFirst)
//!     .with_rule(rules::SprintCapacity);
//! let suggestions = advisor.advise(&schedule, &config);
//! assert_eq!(suggestions.len(), 1); // nothing to improve
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::{AdvisorContext, PersonLane, SprintGroup};
pub use engine::Advisor;

use serde::Serialize;
use std::fmt::{self, Debug};

/// Category of an advisory suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    /// An item is scheduled ahead of the person's first goal.
    PriorityOrder,
    /// Same-type tasks run against their classification rank.
    RankOrder,
    /// A person's sprint effort exceeds the sprint budget.
    Overload,
    /// Overloaded with goals only.
    GoalsAtRisk,
    /// No rule fired.
    Optimized,
}

/// A single advisory message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    pub message: String,
}

impl Suggestion {
    pub fn new(kind: SuggestionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id: None,
            sprint_id: None,
            person: None,
            message: message.into(),
        }
    }

    pub fn for_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn in_sprint(mut self, sprint_id: impl Into<String>) -> Self {
        self.sprint_id = Some(sprint_id.into());
        self
    }

    pub fn for_person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A rule that inspects the grouped schedule and reports suggestions.
///
/// Rules are evaluated independently; the order of their output follows
/// sprint order, then person order within the sprint.
pub trait AdvisoryRule: Send + Sync + Debug {
    /// Rule name (e.g., "GOAL_FIRST").
    fn name(&self) -> &'static str;

    /// Evaluates the rule over every sprint group.
    fn evaluate(&self, ctx: &AdvisorContext<'_>) -> Vec<Suggestion>;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
