//! Schedule (propagation output) model.
//!
//! A schedule holds one [`ScheduledTask`] per input task, in input order,
//! plus the diagnostics collected while computing it. It is rebuilt from
//! scratch on every propagation; nothing here is persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Task;
use crate::dates;

/// A task enriched with its computed dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    /// The input record, unchanged.
    #[serde(flatten)]
    pub task: Task,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Calendar days from project start to `start_date`.
    pub offset_days: i64,
    /// Inclusive calendar-day span (1 for milestones).
    pub calendar_duration: i64,
    /// `start_date` as `dd/MM/yyyy`.
    pub formatted_start_date: String,
    /// `end_date` as `dd/MM/yyyy`.
    pub formatted_end_date: String,
}

impl ScheduledTask {
    /// Derives display fields from settled dates.
    pub fn new(task: Task, start: NaiveDate, end: NaiveDate, project_start: NaiveDate) -> Self {
        let calendar_duration = if task.is_milestone {
            1
        } else {
            dates::days_between(start, end) + 1
        };
        Self {
            offset_days: dates::days_between(project_start, start),
            calendar_duration,
            formatted_start_date: dates::to_display(start),
            formatted_end_date: dates::to_display(end),
            start_date: start,
            end_date: end,
            task,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.task.id
    }

    /// Whether the inclusive span `[start, end]` contains `date`.
    pub fn spans(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Kinds of degradation recorded during propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The task sits on a dependency cycle.
    CyclicDependency,
    /// The dependency id names no task; the task fell back to its anchor.
    UnresolvedDependency,
    /// The sprint id names no sprint; the task fell back to the project anchor.
    UnresolvedSprint,
    /// A date field could not be parsed and was ignored.
    InvalidDate,
    /// A working-day walk hit its step limit.
    AdvanceCapReached,
    /// Propagation stopped at the iteration cap before reaching a fixed point.
    IterationCapReached,
}

/// A recorded fallback, attached to the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Affected task, if the issue is task-specific.
    pub task_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a task-specific diagnostic.
    pub fn for_task(
        kind: DiagnosticKind,
        task_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            task_id: Some(task_id.into()),
            message: message.into(),
        }
    }

    /// Creates a schedule-wide diagnostic.
    pub fn global(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Output of one propagation run.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    /// Date every offset is measured from.
    pub project_start: NaiveDate,
    /// Scheduled tasks, in input order.
    pub tasks: Vec<ScheduledTask>,
    /// Recorded fallbacks.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of passes performed.
    pub iterations: usize,
    /// Whether a pass produced no change before the cap.
    pub converged: bool,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Schedule {
    /// Creates a schedule and indexes it by task id.
    ///
    /// With duplicate ids the first occurrence wins lookups.
    pub fn new(
        project_start: NaiveDate,
        tasks: Vec<ScheduledTask>,
        diagnostics: Vec<Diagnostic>,
        iterations: usize,
        converged: bool,
    ) -> Self {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, t) in tasks.iter().enumerate() {
            index.entry(t.task.id.clone()).or_insert(i);
        }
        Self {
            project_start,
            tasks,
            diagnostics,
            iterations,
            converged,
            index,
        }
    }

    /// Looks up a scheduled task by id.
    pub fn get(&self, task_id: &str) -> Option<&ScheduledTask> {
        self.index.get(task_id).map(|&i| &self.tasks[i])
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }

    /// Tasks not yet completed.
    pub fn active(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter().filter(|t| !t.task.is_completed)
    }

    /// Latest end date across all tasks.
    pub fn project_end(&self) -> Option<NaiveDate> {
        self.tasks.iter().map(|t| t.end_date).max()
    }

    /// Latest end date across non-completed tasks.
    pub fn active_end(&self) -> Option<NaiveDate> {
        self.active().map(|t| t.end_date).max()
    }

    /// Diagnostics of a given kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}
