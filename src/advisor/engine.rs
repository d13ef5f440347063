//! Advisor rule engine.

use std::sync::Arc;

use tracing::debug;

use super::{rules, AdvisorContext, AdvisoryRule, Suggestion, SuggestionKind};
use crate::models::{ProjectConfig, Schedule};
use crate::scheduler::EngineOptions;

/// Affirmation returned when no rule fires.
pub const OPTIMIZED_MESSAGE: &str = "OPTIMIZED: The sequencing follows the priority rules.";

/// A composable set of advisory rules.
///
/// # Example
/// ```
/// use u_gantt::advisor::{rules, Advisor};
///
/// let advisor = Advisor::new().with_rule(rules::RankOrder);
/// assert_eq!(advisor.rule_names(), vec!["RANK_ORDER"]);
/// ```
#[derive(Clone)]
pub struct Advisor {
    rules: Vec<Arc<dyn AdvisoryRule>>,
    options: EngineOptions,
}

impl Advisor {
    /// Creates an advisor with no rules.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            options: EngineOptions::default(),
        }
    }

    /// Advisor with the built-in rules: goal-first, rank order, sprint capacity.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(rules::GoalFirst)
            .with_rule(rules::RankOrder)
            .with_rule(rules::SprintCapacity)
    }

    /// Adds a rule. Rules run in insertion order.
    pub fn with_rule<R: AdvisoryRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the options (utilization factor, default capacity).
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs every rule over the schedule.
    ///
    /// Returns a single [`SuggestionKind::Optimized`] entry when no rule fires.
    pub fn advise(&self, schedule: &Schedule, config: &ProjectConfig) -> Vec<Suggestion> {
        let ctx = AdvisorContext::build(schedule, config, &self.options);

        let mut out = Vec::new();
        for rule in &self.rules {
            let found = rule.evaluate(&ctx);
            debug!(rule = rule.name(), count = found.len(), "advisory rule evaluated");
            out.extend(found);
        }

        if out.is_empty() {
            out.push(Suggestion::new(SuggestionKind::Optimized, OPTIMIZED_MESSAGE));
        }
        out
    }

    /// Suggestion texts only.
    pub fn messages(&self, schedule: &Schedule, config: &ProjectConfig) -> Vec<String> {
        self.advise(schedule, config)
            .into_iter()
            .map(|s| s.message)
            .collect()
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("rules", &self.rule_names())
            .field("sprint_utilization", &self.options.sprint_utilization)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sprint, Squad, Task, TeamMember, UsType};
    use crate::scheduler::Propagator;

    fn config() -> ProjectConfig {
        ProjectConfig::new("2024-01-01")
            .with_member(TeamMember::new("Ana").with_capacity(4.0))
            .with_squad(Squad::new("sq").with_sprint(Sprint::new("s1", "2024-01-01", "2024-01-14")))
    }

    #[test]
    fn test_optimized_when_quiet() {
        let cfg = config();
        let tasks = vec![Task::new("a").with_sprint("s1").with_responsible("Ana")];
        let schedule = Propagator::new().propagate(&tasks, &cfg);

        let out = Advisor::standard().advise(&schedule, &cfg);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SuggestionKind::Optimized);
        assert_eq!(out[0].message, OPTIMIZED_MESSAGE);
    }

    #[test]
    fn test_standard_rules_collect_in_order() {
        let cfg = config();
        // 14 days × 4h × 0.7 = 39.2h budget.
        let tasks = vec![
            Task::new("item").with_sprint("s1").with_responsible("Ana").with_effort(30.0),
            Task::new("goal")
                .with_sprint("s1")
                .with_responsible("Ana")
                .with_us_type(UsType::Goal)
                .with_effort(20.0)
                .with_dependency("item"),
        ];
        let schedule = Propagator::new().propagate(&tasks, &cfg);

        let out = Advisor::standard().advise(&schedule, &cfg);
        let kinds: Vec<_> = out.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SuggestionKind::PriorityOrder, SuggestionKind::Overload]);
        assert!(out[1].message.contains("50.0h"));
        assert!(out[1].message.contains("39.2h"));
    }

    #[test]
    fn test_utilization_option() {
        let cfg = config();
        let tasks = vec![Task::new("a").with_sprint("s1").with_responsible("Ana").with_effort(50.0)];
        let schedule = Propagator::new().propagate(&tasks, &cfg);

        let mut options = EngineOptions::default();
        options.sprint_utilization = 1.0;
        let out = Advisor::standard().with_options(options).advise(&schedule, &cfg);
        assert_eq!(out[0].kind, SuggestionKind::Optimized);
    }

    #[test]
    fn test_debug_lists_rules() {
        let s = format!("{:?}", Advisor::standard());
        assert!(s.contains("GOAL_FIRST"));
        assert!(s.contains("SPRINT_CAPACITY"));
    }
}
