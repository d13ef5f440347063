//! Task model.
//!
//! A task is a unit of work with a duration in working days, an optional
//! single predecessor, and optional sprint/person assignments. Dates on a
//! task are inputs only (manual override); computed dates live in
//! [`ScheduledTask`](super::ScheduledTask).

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Duration given to tasks whose document omits one.
pub const DEFAULT_DURATION_DAYS: u32 = 1;

/// Work layer of a task.
///
/// Only used to decide the inter-task gap: a `Frontend` task following a
/// `Backend` task waits for the hand-off gap instead of the default one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Frontend,
    Backend,
    #[serde(alias = "qualidade")]
    Quality,
    #[default]
    #[serde(other)]
    Other,
}

/// Goal-vs-item classification used by the sequencing advisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsType {
    Goal,
    #[default]
    Item,
}

/// A unit of work to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// External/business identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// User-story identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_id: Option<String>,
    /// Duration in working days (0 = zero-length).
    ///
    /// Documents may carry fractional days; they are rounded up.
    #[serde(default = "default_duration", deserialize_with = "deserialize_duration")]
    pub duration: u32,
    /// Predecessor task id.
    #[serde(default)]
    pub dependency_id: Option<String>,
    #[serde(default, rename = "type")]
    pub category: TaskCategory,
    /// Responsible person, matched against team member names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible: Option<String>,
    /// Effort in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
    /// Manual start override (ISO date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<String>,
    /// Explicitly marked as unplanned work.
    #[serde(default)]
    pub is_not_planned: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    /// Milestones have zero duration and a 1-day display span.
    #[serde(default)]
    pub is_milestone: bool,
    #[serde(default)]
    pub us_type: UsType,
    /// Sequencing rank (lower = earlier). `None` = unranked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<u32>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_DAYS
}

/// Accepts any JSON number: fractions round up, negatives clamp to zero and
/// `null` takes the default.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(days) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(DEFAULT_DURATION_DAYS);
    };
    if days <= 0.0 {
        return Ok(0);
    }
    let whole = days.ceil();
    if whole != days {
        warn!(duration = days, rounded = whole, "fractional duration rounded up");
    }
    Ok(whole.min(f64::from(u32::MAX)) as u32)
}

impl Task {
    /// Creates a 1-day task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            custom_id: None,
            us_id: None,
            duration: DEFAULT_DURATION_DAYS,
            dependency_id: None,
            category: TaskCategory::Other,
            responsible: None,
            effort: None,
            manual_start_date: None,
            sprint_id: None,
            is_not_planned: false,
            is_completed: false,
            completed_date: None,
            is_milestone: false,
            us_type: UsType::Item,
            classification: None,
        }
    }

    /// Creates a milestone.
    pub fn milestone(id: impl Into<String>) -> Self {
        let mut task = Self::new(id);
        task.duration = 0;
        task.is_milestone = true;
        task
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the business identifier.
    pub fn with_custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    /// Sets the user-story identifier.
    pub fn with_us_id(mut self, us_id: impl Into<String>) -> Self {
        self.us_id = Some(us_id.into());
        self
    }

    /// Sets the duration in working days.
    pub fn with_duration(mut self, days: u32) -> Self {
        self.duration = days;
        self
    }

    /// Sets the predecessor.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependency_id = Some(task_id.into());
        self
    }

    /// Sets the work layer.
    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the responsible person.
    pub fn with_responsible(mut self, name: impl Into<String>) -> Self {
        self.responsible = Some(name.into());
        self
    }

    /// Sets the effort in hours.
    pub fn with_effort(mut self, hours: f64) -> Self {
        self.effort = Some(hours);
        self
    }

    /// Pins the start date (ISO `yyyy-MM-dd`).
    pub fn with_manual_start(mut self, date: impl Into<String>) -> Self {
        self.manual_start_date = Some(date.into());
        self
    }

    /// Links the task to a sprint.
    pub fn with_sprint(mut self, sprint_id: impl Into<String>) -> Self {
        self.sprint_id = Some(sprint_id.into());
        self
    }

    /// Marks the task completed on the given ISO date.
    pub fn completed_on(mut self, date: impl Into<String>) -> Self {
        self.is_completed = true;
        self.completed_date = Some(date.into());
        self
    }

    /// Sets the goal/item classification.
    pub fn with_us_type(mut self, us_type: UsType) -> Self {
        self.us_type = us_type;
        self
    }

    /// Sets the sequencing rank.
    pub fn with_classification(mut self, rank: u32) -> Self {
        self.classification = Some(rank);
        self
    }

    /// Duration actually scheduled: milestones are always zero-length.
    pub fn effective_duration(&self) -> u32 {
        if self.is_milestone {
            0
        } else {
            self.duration
        }
    }

    /// Effort in hours, treating an absent value as zero.
    pub fn effort_hours(&self) -> f64 {
        self.effort.unwrap_or(0.0)
    }

    /// Responsible person, ignoring blank names.
    pub fn responsible_name(&self) -> Option<&str> {
        self.responsible
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Predecessor id, ignoring blank values.
    pub fn dependency(&self) -> Option<&str> {
        self.dependency_id.as_deref().filter(|s| !s.is_empty())
    }

    /// Sprint id, ignoring blank values.
    pub fn sprint(&self) -> Option<&str> {
        self.sprint_id.as_deref().filter(|s| !s.is_empty())
    }

    /// Manual start override, ignoring blank values.
    pub fn manual_start(&self) -> Option<&str> {
        self.manual_start_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Unplanned work: explicitly flagged, or not linked to any sprint.
    pub fn is_unplanned(&self) -> bool {
        self.is_not_planned || self.sprint().is_none()
    }

    /// Whether the task is classified as a goal.
    pub fn is_goal(&self) -> bool {
        self.us_type == UsType::Goal
    }
}
