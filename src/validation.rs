//! Input validation for project plans.
//!
//! Checks structural integrity of tasks and configuration. The scheduler
//! tolerates every problem reported here (it falls back instead of failing),
//! so validation is advisory: callers that want strict input can reject on
//! `Err`, while the scheduler reuses [`cyclic_task_ids`] to report cycles.
//!
//! Detects:
//! - Duplicate task IDs, member names, squad and sprint IDs
//! - Dependencies on missing tasks, or on the task itself
//! - Sprint references that resolve to no squad sprint
//! - Member squad memberships that name no configured squad
//! - Unparseable dates
//! - Circular dependency chains
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::dates;
use crate::models::{ProjectConfig, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID (or member name).
    DuplicateId,
    /// A task depends on a task that doesn't exist.
    InvalidDependency,
    /// A task depends on itself.
    SelfDependency,
    /// A task references a sprint that doesn't exist.
    InvalidSprintReference,
    /// A team member belongs to a squad that doesn't exist.
    InvalidSquadReference,
    /// A date field cannot be parsed.
    InvalidDate,
    /// Dependency graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a task list against its configuration.
///
/// Checks:
/// 1. No duplicate task IDs, member names, squad IDs or sprint IDs
/// 2. Every dependency points to another existing task
/// 3. Every sprint reference resolves to a squad sprint, and every member
///    squad id to a squad
/// 4. Project, deadline, manual-start, holiday, day-off and sprint dates parse
/// 5. No circular dependency chains
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tasks: &[Task], config: &ProjectConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    let mut member_names = HashSet::new();
    for member in &config.team_members {
        if !member_names.insert(member.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate team member: {}", member.name),
            ));
        }
    }

    let mut squad_ids = HashSet::new();
    let mut sprint_ids = HashSet::new();
    for squad in &config.squads {
        if !squad_ids.insert(squad.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate squad ID: {}", squad.id),
            ));
        }
        for sprint in &squad.sprints {
            if !sprint_ids.insert(sprint.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate sprint ID: {}", sprint.id),
                ));
            }
        }
    }

    for member in &config.team_members {
        for squad_id in &member.squad_ids {
            if config.squad(squad_id).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSquadReference,
                    format!("Member '{}' belongs to unknown squad '{}'", member.name, squad_id),
                ));
            }
        }
    }

    for task in tasks {
        if let Some(dep) = task.dependency() {
            if dep == task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' depends on itself", task.id),
                ));
            } else if !task_ids.contains(dep) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Task '{}' depends on unknown task '{}'", task.id, dep),
                ));
            }
        }

        if let Some(sprint) = task.sprint() {
            if !sprint_ids.contains(sprint) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSprintReference,
                    format!("Task '{}' references unknown sprint '{}'", task.id, sprint),
                ));
            }
        }

        if let Some(manual) = task.manual_start() {
            check_date(&mut errors, manual, &format!("manual start of task '{}'", task.id));
        }
    }

    check_dates(&mut errors, config);

    for id in cyclic_task_ids(tasks) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Circular dependency detected involving task '{id}'"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_date(errors: &mut Vec<ValidationError>, value: &str, what: &str) {
    if dates::parse_iso(value).is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidDate,
            format!("Invalid date '{value}' in {what}"),
        ));
    }
}

fn check_dates(errors: &mut Vec<ValidationError>, config: &ProjectConfig) {
    check_date(errors, &config.project_start_date, "project start");
    if !config.deadline.trim().is_empty() {
        check_date(errors, &config.deadline, "project deadline");
    }
    for holiday in &config.holidays {
        check_date(errors, holiday, "project holidays");
    }
    for member in &config.team_members {
        for day in &member.days_off {
            check_date(errors, day, &format!("days off of '{}'", member.name));
        }
    }
    for squad in &config.squads {
        for holiday in &squad.holidays {
            check_date(errors, holiday, &format!("holidays of squad '{}'", squad.id));
        }
        for sprint in &squad.sprints {
            check_date(errors, &sprint.start_date, &format!("start of sprint '{}'", sprint.id));
            check_date(errors, &sprint.end_date, &format!("end of sprint '{}'", sprint.id));
        }
    }
}

/// Returns the IDs of every task that sits on a dependency cycle, in input
/// order. Tasks that merely lead into a cycle are not included.
///
/// # Algorithm
/// DFS with three colors over the dependency graph. Each task has at most
/// one outgoing edge (its dependency), so the DFS is a walk along the chain;
/// reaching a task that is still on the current walk closes a cycle, and
/// every task from that point to the end of the walk is on it.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
pub fn cyclic_task_ids(tasks: &[Task]) -> Vec<String> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let next: HashMap<&str, &str> = tasks
        .iter()
        .filter_map(|t| t.dependency().map(|dep| (t.id.as_str(), dep)))
        .collect();

    let mut color: HashMap<&str, Color> =
        tasks.iter().map(|t| (t.id.as_str(), Color::White)).collect();
    let mut on_cycle: HashSet<&str> = HashSet::new();

    for task in tasks {
        let root = task.id.as_str();
        if color.get(root) != Some(&Color::White) {
            continue;
        }

        let mut path: Vec<&str> = Vec::new();
        let mut node = Some(root);
        while let Some(current) = node {
            match color.get(current).copied() {
                // Dangling reference: the chain ends here.
                None | Some(Color::Black) => break,
                Some(Color::Gray) => {
                    // Back edge: the cycle is the tail of the path from `current`.
                    if let Some(pos) = path.iter().position(|&n| n == current) {
                        on_cycle.extend(path[pos..].iter().copied());
                    }
                    break;
                }
                Some(Color::White) => {
                    color.insert(current, Color::Gray);
                    path.push(current);
                    node = next.get(current).copied();
                }
            }
        }

        for n in path {
            color.insert(n, Color::Black);
        }
    }

    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter(|t| on_cycle.contains(t.id.as_str()) && seen.insert(t.id.as_str()))
        .map(|t| t.id.clone())
        .collect()
}
