//! Fixed-point date propagation.
//!
//! # Algorithm
//!
//! Iterative relaxation rather than a topological sort: dependencies may be
//! declared in any order, and a task only reads the end date its predecessor
//! settled in an earlier (or the current) pass.
//!
//! 1. Keep a map `task id → (start, end, category)`, initially empty.
//! 2. Each pass, for every task pick a start by the first rule that applies:
//!    manual start → predecessor end + gap → sprint start → project start,
//!    each moved to the next working day of the task's calendar.
//! 3. Count the duration in working days from that start.
//! 4. A pass that changes no (start, end) pair is a fixed point.
//! 5. Stop at the fixed point or at `iteration_factor × task count` passes.
//!
//! Cycles cannot converge. They are detected up front and reported as
//! diagnostics; the pass cap then bounds the work and the cycle's tasks keep
//! whatever dates they last held.
//!
//! # Complexity
//! O(k · n · w) for k passes, n tasks and w calendar days walked per task.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::EngineOptions;
use crate::dates;
use crate::models::{
    CalendarContext, Diagnostic, DiagnosticKind, ProjectConfig, Schedule, ScheduledTask, Sprint,
    Squad, Task, TaskCategory, WorkCalendar,
};
use crate::validation::cyclic_task_ids;

/// Settled dates of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tentative {
    start: NaiveDate,
    end: NaiveDate,
    category: TaskCategory,
}

/// Per-task lookups resolved once before the passes.
struct Resolved<'a> {
    task: &'a Task,
    manual_start: Option<NaiveDate>,
    sprint: Option<&'a Sprint>,
    squad: Option<&'a Squad>,
}

impl<'a> Resolved<'a> {
    fn context(&self) -> CalendarContext<'a> {
        CalendarContext::global()
            .for_person(self.task.responsible_name())
            .in_squad(self.squad)
    }
}

/// The date propagation engine.
///
/// Pure over its inputs: it reads tasks and configuration and returns a new
/// [`Schedule`], mutating nothing.
///
/// # Example
///
/// ```
/// use u_gantt::models::{ProjectConfig, Task};
/// use u_gantt::scheduler::Propagator;
///
/// let config = ProjectConfig::new("2024-01-01");
/// let tasks = vec![Task::new("T1").with_duration(5)];
///
/// let schedule = Propagator::new().propagate(&tasks, &config);
/// assert_eq!(schedule.get("T1").unwrap().formatted_end_date, "05/01/2024");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    options: EngineOptions,
}

impl Propagator {
    /// Creates a propagator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a propagator with the given options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Project anchor: the configured start, or "today" when unreadable.
    pub fn project_start(&self, config: &ProjectConfig) -> NaiveDate {
        config.project_start().unwrap_or_else(|| {
            let today = self.options.today();
            warn!(
                value = %config.project_start_date,
                fallback = %today,
                "project start unreadable, anchoring on today"
            );
            today
        })
    }

    /// Computes start and end dates for every task.
    pub fn propagate(&self, tasks: &[Task], config: &ProjectConfig) -> Schedule {
        let calendar = WorkCalendar::new(config);
        let project_start = self.project_start(config);
        let mut diagnostics = Vec::new();

        if config.project_start().is_none() {
            diagnostics.push(Diagnostic::global(
                DiagnosticKind::InvalidDate,
                format!(
                    "Project start '{}' is not a valid date; using {}",
                    config.project_start_date,
                    dates::to_iso(project_start)
                ),
            ));
        }

        let resolved = self.resolve(tasks, config, &mut diagnostics);

        let cyclic = cyclic_task_ids(tasks);
        if !cyclic.is_empty() {
            warn!(tasks = ?cyclic, "dependency cycle detected; propagation will be capped");
            for id in &cyclic {
                diagnostics.push(Diagnostic::for_task(
                    DiagnosticKind::CyclicDependency,
                    id.clone(),
                    format!("Task '{id}' is part of a dependency cycle"),
                ));
            }
        }

        let cap = self.options.iteration_cap(tasks.len());
        let mut settled: HashMap<&str, Tentative> = HashMap::with_capacity(tasks.len());
        let mut capped_walks: HashSet<&str> = HashSet::new();
        let mut iterations = 0;
        let mut has_changes = !resolved.is_empty();

        while has_changes && iterations < cap {
            has_changes = false;
            iterations += 1;

            for r in &resolved {
                let ctx = r.context();
                let (start, start_capped) =
                    self.candidate_start(r, &ctx, &calendar, &settled, project_start);
                let end_walk = calendar.end_date(
                    start,
                    r.task.effective_duration(),
                    &ctx,
                    self.options.duration_mode,
                    self.options.duration_limit_days,
                );

                if start_capped || end_walk.capped {
                    capped_walks.insert(r.task.id.as_str());
                }

                let candidate = Tentative {
                    start,
                    end: end_walk.date,
                    category: r.task.category,
                };
                let unchanged = settled
                    .get(r.task.id.as_str())
                    .is_some_and(|prev| prev.start == candidate.start && prev.end == candidate.end);
                if !unchanged {
                    settled.insert(r.task.id.as_str(), candidate);
                    has_changes = true;
                }
            }
        }

        let converged = !has_changes;
        if converged {
            debug!(iterations, tasks = tasks.len(), "propagation converged");
        } else {
            warn!(iterations, cap, "propagation stopped at the iteration cap");
            diagnostics.push(Diagnostic::global(
                DiagnosticKind::IterationCapReached,
                format!("Propagation stopped after {iterations} passes without settling"),
            ));
        }

        for task in tasks {
            if capped_walks.contains(task.id.as_str()) {
                diagnostics.push(Diagnostic::for_task(
                    DiagnosticKind::AdvanceCapReached,
                    task.id.clone(),
                    format!("No working day found in range for task '{}'", task.id),
                ));
            }
        }

        let scheduled = tasks
            .iter()
            .map(|task| {
                let (start, end) = settled
                    .get(task.id.as_str())
                    .map(|t| (t.start, t.end))
                    .unwrap_or((project_start, project_start));
                ScheduledTask::new(task.clone(), start, end, project_start)
            })
            .collect();

        Schedule::new(project_start, scheduled, diagnostics, iterations, converged)
    }

    /// Resolves manual dates, sprints and squads once, recording dangling
    /// references.
    fn resolve<'a>(
        &self,
        tasks: &'a [Task],
        config: &'a ProjectConfig,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Resolved<'a>> {
        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        tasks
            .iter()
            .map(|task| {
                let manual_start = task.manual_start().and_then(|raw| {
                    let parsed = dates::parse_iso(raw);
                    if parsed.is_none() {
                        warn!(task_id = %task.id, value = raw, "manual start ignored");
                        diagnostics.push(Diagnostic::for_task(
                            DiagnosticKind::InvalidDate,
                            task.id.clone(),
                            format!("Manual start '{raw}' of task '{}' is not a valid date", task.id),
                        ));
                    }
                    parsed
                });

                if let Some(dep) = task.dependency() {
                    if !ids.contains(dep) {
                        warn!(task_id = %task.id, dependency = dep, "dependency not found");
                        diagnostics.push(Diagnostic::for_task(
                            DiagnosticKind::UnresolvedDependency,
                            task.id.clone(),
                            format!("Task '{}' depends on unknown task '{dep}'", task.id),
                        ));
                    }
                }

                let (sprint, squad) = match task.sprint() {
                    Some(sprint_id) => match config.find_sprint(sprint_id) {
                        Some((sprint, squad)) => (Some(sprint), Some(squad)),
                        None => {
                            warn!(task_id = %task.id, sprint_id, "sprint not found");
                            diagnostics.push(Diagnostic::for_task(
                                DiagnosticKind::UnresolvedSprint,
                                task.id.clone(),
                                format!("Task '{}' references unknown sprint '{sprint_id}'", task.id),
                            ));
                            (None, None)
                        }
                    },
                    None => (None, None),
                };

                Resolved {
                    task,
                    manual_start,
                    sprint,
                    squad,
                }
            })
            .collect()
    }

    /// Picks the start date for one task in the current pass.
    ///
    /// Returns the date and whether the working-day advance was capped.
    fn candidate_start(
        &self,
        r: &Resolved<'_>,
        ctx: &CalendarContext<'_>,
        calendar: &WorkCalendar<'_>,
        settled: &HashMap<&str, Tentative>,
        project_start: NaiveDate,
    ) -> (NaiveDate, bool) {
        let limit = self.options.advance_limit_days;

        let anchor = if let Some(manual) = r.manual_start {
            manual
        } else if let Some(dep) = r.task.dependency().and_then(|id| settled.get(id)) {
            dates::add_days(dep.end, self.gap_after(dep.category, r.task.category))
        } else if let Some(sprint_start) = r.sprint.and_then(Sprint::start) {
            sprint_start
        } else {
            project_start
        };

        let walk = calendar.next_working_day(anchor, ctx, limit);
        (walk.date, walk.capped)
    }

    /// Calendar days between a predecessor's end and the next candidate start.
    fn gap_after(&self, predecessor: TaskCategory, current: TaskCategory) -> i64 {
        if predecessor == TaskCategory::Backend && current == TaskCategory::Frontend {
            self.options.handoff_gap_days
        } else {
            self.options.default_gap_days
        }
    }
}
