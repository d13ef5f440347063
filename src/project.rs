//! Project container and full analysis.
//!
//! [`Project`] holds the two root records (task list and configuration)
//! together with the engine options, loads and saves them as one JSON
//! document, and runs every computation in one call.
//!
//! # Pipeline
//!
//! ```text
//! tasks + config ─► Propagator ─► Schedule ─┬─► critical_path
//!                                           ├─► DeadlineInfo ─► CapacityStats
//!                                           ├─► RiskDetector
//!                                           └─► Advisor
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advisor::{Advisor, Suggestion};
use crate::analysis::{critical_path, CapacityStats, DeadlineInfo, Risk, RiskDetector};
use crate::dates;
use crate::error::{GanttError, Result};
use crate::legacy;
use crate::models::{ProjectConfig, Schedule, Task};
use crate::scheduler::{EngineOptions, Propagator};
use crate::validation::validate_input;

/// Everything derived from one project snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    pub schedule: Schedule,
    /// Ids on the chain(s) finishing last, tips first.
    pub critical_path: Vec<String>,
    pub deadlines: DeadlineInfo,
    /// Capacity over `[project start, effective deadline]`.
    pub capacity: CapacityStats,
    pub risks: Vec<Risk>,
    /// User-entered risk notes, carried through unchanged.
    pub manual_risks: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

impl ProjectAnalysis {
    /// Automatic risk messages followed by the manual notes.
    pub fn risk_messages(&self) -> Vec<String> {
        self.risks
            .iter()
            .map(|r| r.message.clone())
            .chain(self.manual_risks.iter().cloned())
            .collect()
    }

    pub fn suggestion_messages(&self) -> Vec<String> {
        self.suggestions.iter().map(|s| s.message.clone()).collect()
    }
}

/// A project snapshot: tasks, configuration and engine options.
///
/// # Example
///
/// ```
/// use u_gantt::models::{ProjectConfig, Task};
/// use u_gantt::project::Project;
///
/// let project = Project::new(ProjectConfig::new("2024-01-01"))
///     .with_task(Task::new("A").with_duration(5))
///     .with_task(Task::new("B").with_duration(2).with_dependency("A"));
///
/// let analysis = project.analyze();
/// assert_eq!(analysis.critical_path, vec!["B", "A"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub config: ProjectConfig,
    #[serde(default)]
    pub options: EngineOptions,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u64,
    #[serde(flatten)]
    project: &'a Project,
}

impl Project {
    /// Creates an empty project with default options.
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            tasks: Vec::new(),
            config,
            options: EngineOptions::default(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Loads a document of any supported version.
    ///
    /// # Errors
    /// Malformed JSON, an unsupported version, or a shape that does not
    /// match the current model after migration.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        let doc = legacy::migrate(raw)?;
        let project: Project = serde_json::from_value(doc)?;
        debug!(tasks = project.tasks.len(), "project loaded");
        Ok(project)
    }

    /// Saves the project as a current-version document.
    pub fn to_json(&self) -> Result<String> {
        let doc = DocumentRef {
            version: legacy::CURRENT_VERSION,
            project: self,
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Strict integrity check of the inputs.
    ///
    /// Scheduling tolerates every problem reported here; use this to reject
    /// input up front.
    pub fn validate(&self) -> Result<()> {
        validate_input(&self.tasks, &self.config).map_err(GanttError::Validation)
    }

    /// Propagates dates.
    pub fn schedule(&self) -> Schedule {
        Propagator::with_options(self.options.clone()).propagate(&self.tasks, &self.config)
    }

    /// Runs propagation and every analysis.
    pub fn analyze(&self) -> ProjectAnalysis {
        let schedule = self.schedule();

        let critical_path = critical_path(&schedule);
        let deadlines =
            DeadlineInfo::resolve(&schedule, &self.config, self.options.deadline_buffer_days);
        let capacity = CapacityStats::calculate(
            &self.config,
            schedule.project_start,
            deadlines.effective_deadline,
        );
        let risks = RiskDetector::with_options(self.options.clone()).detect(&schedule, &self.config);
        let suggestions = Advisor::standard()
            .with_options(self.options.clone())
            .advise(&schedule, &self.config);

        debug!(
            iterations = schedule.iterations,
            converged = schedule.converged,
            risks = risks.len(),
            suggestions = suggestions.len(),
            "project analyzed"
        );

        ProjectAnalysis {
            schedule,
            critical_path,
            deadlines,
            capacity,
            risks,
            manual_risks: self.config.risks.clone(),
            suggestions,
        }
    }

    /// Analysis with "today" pinned to an ISO date.
    ///
    /// # Errors
    /// [`GanttError::InvalidDate`] if `today` is not a `yyyy-MM-dd` date.
    pub fn analyze_at(&self, today: &str) -> Result<ProjectAnalysis> {
        let date = dates::parse_iso(today).ok_or_else(|| GanttError::InvalidDate {
            field: "today".into(),
            value: today.into(),
        })?;
        let pinned = self.clone().with_options(self.options.clone().with_today(date));
        Ok(pinned.analyze())
    }
}
