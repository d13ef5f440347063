//! Working-day calendar.
//!
//! Resolves whether a date is a working day for an optional person in an
//! optional squad context, and walks dates forward over working days.
//!
//! # Precedence
//! First match wins:
//! 1. The date is a holiday of the active list (squad list when a squad
//!    context is given, else the project list).
//! 2. The active weekend policy skips weekends and the date is Sat/Sun.
//! 3. The responsible person has the date as a personal day off.
//!
//! Walks are bounded: once the step limit is reached they return the last
//! date reached and flag the result as capped.
//!
//! Holiday lists and days off are parsed once, when the calendar is built;
//! each day test is then a set lookup.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ProjectConfig, Squad};
use crate::dates;

/// How a task's duration is counted against working days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationMode {
    /// The start day is day 1 only if it is a working day; otherwise the walk
    /// first moves to the next working day.
    #[default]
    WorkingStartOnly,
    /// The start day is always day 1, working or not.
    StartAlwaysCounts,
}

/// Who and where a date is being evaluated for.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarContext<'a> {
    /// Responsible person (matched against the roster by name).
    pub responsible: Option<&'a str>,
    /// Squad whose calendar replaces the project calendar.
    pub squad: Option<&'a Squad>,
}

impl<'a> CalendarContext<'a> {
    /// Project calendar, nobody's days off.
    pub fn global() -> Self {
        Self::default()
    }

    /// Sets the responsible person.
    pub fn for_person(mut self, name: Option<&'a str>) -> Self {
        self.responsible = name;
        self
    }

    /// Sets the squad calendar.
    pub fn in_squad(mut self, squad: Option<&'a Squad>) -> Self {
        self.squad = squad;
        self
    }
}

/// Result of a bounded walk over the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    /// Date reached.
    pub date: NaiveDate,
    /// Whether the step limit stopped the walk early.
    pub capped: bool,
}

impl Walk {
    fn done(date: NaiveDate) -> Self {
        Self { date, capped: false }
    }
}

fn date_set<'s>(list: impl IntoIterator<Item = &'s String>) -> HashSet<NaiveDate> {
    list.into_iter().filter_map(|d| dates::parse_iso(d)).collect()
}

/// Working-day calendar over a project configuration.
#[derive(Debug, Clone)]
pub struct WorkCalendar<'a> {
    config: &'a ProjectConfig,
    holidays: HashSet<NaiveDate>,
    /// First squad per id, with its parsed holidays.
    squad_holidays: HashMap<&'a str, (&'a Squad, HashSet<NaiveDate>)>,
    /// First roster entry per name.
    days_off: HashMap<&'a str, HashSet<NaiveDate>>,
}

impl<'a> WorkCalendar<'a> {
    /// Creates a calendar reading rules from `config`.
    pub fn new(config: &'a ProjectConfig) -> Self {
        let mut squad_holidays = HashMap::with_capacity(config.squads.len());
        for squad in &config.squads {
            squad_holidays
                .entry(squad.id.as_str())
                .or_insert_with(|| (squad, date_set(&squad.holidays)));
        }

        let mut days_off = HashMap::with_capacity(config.team_members.len());
        for member in &config.team_members {
            days_off
                .entry(member.name.as_str())
                .or_insert_with(|| member.parsed_days_off().collect());
        }

        Self {
            config,
            holidays: date_set(&config.holidays),
            squad_holidays,
            days_off,
        }
    }

    fn is_holiday(&self, date: NaiveDate, ctx: &CalendarContext<'_>) -> bool {
        let Some(squad) = ctx.squad else {
            return self.holidays.contains(&date);
        };
        match self.squad_holidays.get(squad.id.as_str()) {
            Some((known, set)) if std::ptr::eq(*known, squad) => set.contains(&date),
            // A squad from outside this configuration.
            _ => dates::list_contains(&squad.holidays, date),
        }
    }

    /// Holiday list in effect for the context.
    pub fn holidays<'c>(&self, ctx: &CalendarContext<'c>) -> &'c [String]
    where
        'a: 'c,
    {
        match ctx.squad {
            Some(squad) => &squad.holidays,
            None => &self.config.holidays,
        }
    }

    /// Weekend policy in effect for the context.
    pub fn skips_weekends(&self, ctx: &CalendarContext<'_>) -> bool {
        ctx.squad
            .map(|s| s.skip_weekends)
            .unwrap_or(self.config.skip_weekends)
    }

    /// Whether `date` is excluded from work in the given context.
    pub fn is_non_working_day(&self, date: NaiveDate, ctx: &CalendarContext<'_>) -> bool {
        if self.is_holiday(date, ctx) {
            return true;
        }

        if self.skips_weekends(ctx) && dates::is_weekend(date) {
            return true;
        }

        ctx.responsible
            .and_then(|name| self.days_off.get(name))
            .is_some_and(|off| off.contains(&date))
    }

    /// String-boundary variant of [`Self::is_non_working_day`].
    ///
    /// An unparseable date is treated as a working day.
    pub fn is_non_working_iso(&self, date: &str, ctx: &CalendarContext<'_>) -> bool {
        match dates::parse_iso(date) {
            Some(d) => self.is_non_working_day(d, ctx),
            None => {
                warn!(value = date, "unparseable date treated as working day");
                false
            }
        }
    }

    /// Negation of [`Self::is_non_working_day`].
    #[inline]
    pub fn is_working_day(&self, date: NaiveDate, ctx: &CalendarContext<'_>) -> bool {
        !self.is_non_working_day(date, ctx)
    }

    /// Next working day on or after `date`, taking at most `limit` steps.
    pub fn next_working_day(&self, date: NaiveDate, ctx: &CalendarContext<'_>, limit: u32) -> Walk {
        let mut current = date;
        let mut steps = 0;
        while self.is_non_working_day(current, ctx) {
            if steps >= limit {
                warn!(from = %date, limit, "no working day found within advance limit");
                return Walk {
                    date: current,
                    capped: true,
                };
            }
            current = dates::add_days(current, 1);
            steps += 1;
        }
        Walk::done(current)
    }

    /// Last day of a task of `duration` working days beginning at `start`.
    ///
    /// Zero duration ends on `start`. `limit` bounds the number of calendar
    /// days walked (including any initial advance).
    pub fn end_date(
        &self,
        start: NaiveDate,
        duration: u32,
        ctx: &CalendarContext<'_>,
        mode: DurationMode,
        limit: u32,
    ) -> Walk {
        if duration == 0 {
            return Walk::done(start);
        }

        let mut current = start;
        let mut steps: u32 = 0;

        if mode == DurationMode::WorkingStartOnly {
            let first = self.next_working_day(start, ctx, limit);
            if first.capped {
                return first;
            }
            steps += dates::days_between(start, first.date) as u32;
            current = first.date;
        }

        let mut counted: u32 = 1;
        while counted < duration {
            if steps >= limit {
                warn!(start = %start, duration, limit, "end date walk hit its limit");
                return Walk {
                    date: current,
                    capped: true,
                };
            }
            current = dates::add_days(current, 1);
            steps += 1;
            if self.is_working_day(current, ctx) {
                counted += 1;
            }
        }

        Walk::done(current)
    }

    /// Working days in the inclusive range `[start, end]`.
    pub fn working_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        ctx: &CalendarContext<'_>,
    ) -> u32 {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_working_day(*d, ctx))
            .count() as u32
    }
}
