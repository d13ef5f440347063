//! Working-day-aware project scheduling.
//!
//! Turns a task list with single predecessors, durations and assignments,
//! plus a calendar model (holidays, weekends, personal days off, squads and
//! sprints), into concrete start and end dates. On top of the resulting
//! schedule it derives the critical path, team capacity, risks and
//! sequencing advice.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `TeamMember`, `Squad`, `Sprint`,
//!   `ProjectConfig`, `WorkCalendar`, `Schedule`, `ScheduledTask`
//! - **`dates`**: ISO parsing, display formatting, calendar-day arithmetic
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling refs, cycles)
//! - **`scheduler`**: `EngineOptions` and the fixed-point `Propagator`
//! - **`analysis`**: Critical path, deadlines, capacity, risks
//! - **`advisor`**: Sprint sequencing rules and the `Advisor` rule engine
//! - **`legacy`**: Migration of older persisted documents
//! - **`project`**: `Project` container with JSON I/O and one-call analysis
//! - **`error`**: `GanttError`
//!
//! # Quick start
//!
//! ```
//! use u_gantt::models::{ProjectConfig, Task, TaskCategory};
//! use u_gantt::project::Project;
//!
//! let config = ProjectConfig::new("2024-01-01").with_holiday("2024-01-01");
//! let project = Project::new(config)
//!     .with_task(Task::new("api").with_duration(3).with_category(TaskCategory::Backend))
//!     .with_task(
//!         Task::new("ui")
//!             .with_duration(2)
//!             .with_category(TaskCategory::Frontend)
//!             .with_dependency("api"),
//!     );
//!
//! let analysis = project.analyze();
//! let ui = analysis.schedule.get("ui").unwrap();
//! assert_eq!(ui.formatted_start_date, "08/01/2024");
//! ```
//!
//! # Failure model
//!
//! Scheduling never fails. Unreadable dates, dangling references and
//! cycles degrade to fallbacks that are logged through `tracing` and
//! recorded as [`models::Diagnostic`]s on the schedule. Only the document
//! boundary (`project`, `legacy`) returns [`error::GanttError`].

pub mod advisor;
pub mod analysis;
pub mod dates;
pub mod error;
pub mod legacy;
pub mod models;
pub mod project;
pub mod scheduler;
pub mod validation;

pub use error::GanttError;
