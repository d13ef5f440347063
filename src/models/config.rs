//! Project configuration.
//!
//! The second root record next to the task list: global calendar rules,
//! the roster, and the squads with their sprints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Sprint, Squad, TeamMember};
use crate::dates;

/// Global project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// ISO project start date.
    pub project_start_date: String,
    /// ISO manual deadline; empty = none.
    #[serde(default)]
    pub deadline: String,
    #[serde(default = "default_true")]
    pub skip_weekends: bool,
    /// Project-wide holidays (ISO dates).
    #[serde(default)]
    pub holidays: Vec<String>,
    /// Free-text risk notes entered by users.
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub squads: Vec<Squad>,
}

fn default_true() -> bool {
    true
}

impl ProjectConfig {
    /// Creates a config starting on the given ISO date, skipping weekends.
    pub fn new(project_start_date: impl Into<String>) -> Self {
        Self {
            project_start_date: project_start_date.into(),
            deadline: String::new(),
            skip_weekends: true,
            holidays: Vec::new(),
            risks: Vec::new(),
            team_members: Vec::new(),
            squads: Vec::new(),
        }
    }

    /// Sets the manual deadline.
    pub fn with_deadline(mut self, date: impl Into<String>) -> Self {
        self.deadline = date.into();
        self
    }

    /// Sets the weekend policy.
    pub fn with_skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    /// Adds a project-wide holiday.
    pub fn with_holiday(mut self, date: impl Into<String>) -> Self {
        self.holidays.push(date.into());
        self
    }

    /// Adds a free-text risk note.
    pub fn with_risk(mut self, note: impl Into<String>) -> Self {
        self.risks.push(note.into());
        self
    }

    /// Adds a team member.
    pub fn with_member(mut self, member: TeamMember) -> Self {
        self.team_members.push(member);
        self
    }

    /// Adds a squad.
    pub fn with_squad(mut self, squad: Squad) -> Self {
        self.squads.push(squad);
        self
    }

    /// Parsed project start; `None` if missing or malformed.
    pub fn project_start(&self) -> Option<NaiveDate> {
        dates::parse_logged(&self.project_start_date, "projectStartDate")
    }

    /// Parsed manual deadline; `None` if unset or malformed.
    pub fn manual_deadline(&self) -> Option<NaiveDate> {
        dates::parse_logged(&self.deadline, "deadline")
    }

    /// Roster lookup by name.
    pub fn member(&self, name: &str) -> Option<&TeamMember> {
        self.team_members.iter().find(|m| m.name == name)
    }

    /// Squad lookup by id.
    pub fn squad(&self, squad_id: &str) -> Option<&Squad> {
        self.squads.iter().find(|s| s.id == squad_id)
    }

    /// Finds a sprint across all squads, together with its owner.
    pub fn find_sprint(&self, sprint_id: &str) -> Option<(&Sprint, &Squad)> {
        self.squads
            .iter()
            .find_map(|squad| squad.sprint(sprint_id).map(|sprint| (sprint, squad)))
    }

    /// Iterates every sprint of every squad.
    pub fn all_sprints(&self) -> impl Iterator<Item = (&Sprint, &Squad)> {
        self.squads
            .iter()
            .flat_map(|squad| squad.sprints.iter().map(move |sprint| (sprint, squad)))
    }
}
