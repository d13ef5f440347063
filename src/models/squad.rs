//! Squad and sprint models.
//!
//! A squad is an optional calendar-override context: tasks whose sprint
//! belongs to a squad are scheduled with that squad's holidays and weekend
//! policy instead of the project's. Sprints act as start anchors for tasks
//! that have neither a dependency nor a manual start.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;

/// A time-boxed iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// ISO start date.
    pub start_date: String,
    /// ISO end date (inclusive).
    pub end_date: String,
    /// Owning squad (informational; ownership is by nesting).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_id: Option<String>,
}

impl Sprint {
    /// Creates a sprint spanning `[start, end]` (ISO dates).
    pub fn new(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date: start.into(),
            end_date: end.into(),
            squad_id: None,
        }
    }

    /// Sets the sprint name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning squad.
    pub fn with_squad(mut self, squad_id: impl Into<String>) -> Self {
        self.squad_id = Some(squad_id.into());
        self
    }

    pub fn start(&self) -> Option<NaiveDate> {
        dates::parse_logged(&self.start_date, "sprint.startDate")
    }

    pub fn end(&self) -> Option<NaiveDate> {
        dates::parse_logged(&self.end_date, "sprint.endDate")
    }

    /// Inclusive calendar-day span; 0 if either bound is unreadable or the
    /// sprint is inverted.
    pub fn calendar_days(&self) -> i64 {
        match (self.start(), self.end()) {
            (Some(s), Some(e)) => (dates::days_between(s, e) + 1).max(0),
            _ => 0,
        }
    }

    /// Name for messages, falling back to the id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// A team unit with its own calendar rules and sprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Squad {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default = "default_true")]
    pub skip_weekends: bool,
    /// Squad-specific holidays (ISO dates). Replaces the project list.
    #[serde(default)]
    pub holidays: Vec<String>,
    /// Owned sprints, ordered by start date.
    #[serde(default)]
    pub sprints: Vec<Sprint>,
}

fn default_true() -> bool {
    true
}

impl Squad {
    /// Creates a squad that skips weekends and has no holidays.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            color: String::new(),
            start_date: String::new(),
            deadline: String::new(),
            skip_weekends: true,
            holidays: Vec::new(),
            sprints: Vec::new(),
        }
    }

    /// Sets the squad name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekend policy.
    pub fn with_skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: impl Into<String>) -> Self {
        self.holidays.push(date.into());
        self
    }

    /// Adds a sprint, stamping it with this squad's id and keeping the list
    /// ordered by start date.
    pub fn with_sprint(mut self, sprint: Sprint) -> Self {
        let sprint = sprint.with_squad(self.id.clone());
        self.sprints.push(sprint);
        self.sprints.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        self
    }

    /// Finds an owned sprint by id.
    pub fn sprint(&self, sprint_id: &str) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.id == sprint_id)
    }
}
