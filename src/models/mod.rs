//! Project planning domain models.
//!
//! Provides the input records (tasks and project configuration, with the
//! roster, squads and sprints it owns), the working-day calendar, and the
//! propagation output.
//!
//! # Ownership
//!
//! | Record | Owned by | Referenced by |
//! |--------|----------|---------------|
//! | Task | caller's task list | other tasks (`dependencyId`) |
//! | TeamMember | ProjectConfig | tasks (`responsible`, by name) |
//! | Squad | ProjectConfig | team members (`squadIds`) |
//! | Sprint | Squad | tasks (`sprintId`) |
//!
//! References are weak: a dangling id degrades to a fallback, never an error.

mod calendar;
mod config;
mod schedule;
mod squad;
mod task;
mod team;

pub use calendar::{CalendarContext, DurationMode, Walk, WorkCalendar};
pub use config::ProjectConfig;
pub use schedule::{Diagnostic, DiagnosticKind, Schedule, ScheduledTask};
pub use squad::{Sprint, Squad};
pub use task::{Task, TaskCategory, UsType};
pub use team::{TeamMember, DEFAULT_CAPACITY_HOURS};
