//! Team member model.
//!
//! Members are the people tasks are assigned to. Each carries a daily
//! capacity in hours and a personal day-off list that removes working days
//! from their own calendar only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;

/// Default daily capacity (hours) for people not in the roster.
pub const DEFAULT_CAPACITY_HOURS: f64 = 8.0;

/// A person on the project roster. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    /// Hours available per working day.
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    /// Personal days off (ISO dates).
    #[serde(default)]
    pub days_off: Vec<String>,
    /// Sector tag (free text).
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub squad_ids: Vec<String>,
}

fn default_capacity() -> f64 {
    DEFAULT_CAPACITY_HOURS
}

impl TeamMember {
    /// Creates a member with the default 8h/day capacity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: DEFAULT_CAPACITY_HOURS,
            days_off: Vec::new(),
            sector: String::new(),
            squad_ids: Vec::new(),
        }
    }

    /// Sets the daily capacity.
    pub fn with_capacity(mut self, hours_per_day: f64) -> Self {
        self.capacity = hours_per_day;
        self
    }

    /// Adds a personal day off (ISO date).
    pub fn with_day_off(mut self, date: impl Into<String>) -> Self {
        self.days_off.push(date.into());
        self
    }

    /// Sets the sector tag.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    /// Adds a squad membership.
    pub fn with_squad(mut self, squad_id: impl Into<String>) -> Self {
        self.squad_ids.push(squad_id.into());
        self
    }

    /// Parsed days off; malformed entries are skipped.
    pub fn parsed_days_off(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days_off.iter().filter_map(|d| dates::parse_iso(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_builder() {
        let m = TeamMember::new("Ana")
            .with_capacity(6.0)
            .with_day_off("2024-01-03")
            .with_sector("Backend")
            .with_squad("sq1");

        assert_eq!(m.name, "Ana");
        assert!((m.capacity - 6.0).abs() < 1e-10);
        let off: Vec<_> = m.parsed_days_off().collect();
        assert_eq!(off, vec![NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()]);
        assert_eq!(m.squad_ids, vec!["sq1"]);
    }

    #[test]
    fn test_member_defaults_from_json() {
        let m: TeamMember = serde_json::from_str(r#"{"name":"Rui"}"#).unwrap();
        assert!((m.capacity - DEFAULT_CAPACITY_HOURS).abs() < 1e-10);
        assert!(m.days_off.is_empty());
        assert!(m.squad_ids.is_empty());
    }

    #[test]
    fn test_parsed_days_off_skips_garbage() {
        let m = TeamMember::new("Ana")
            .with_day_off("2024-01-03")
            .with_day_off("someday");
        assert_eq!(m.parsed_days_off().count(), 1);
    }
}
