//! Derived metrics over a propagated schedule.
//!
//! All functions here are pure: they read a [`Schedule`](crate::models::Schedule)
//! and its configuration and build fresh results.
//!
//! - **`critical_path`**: ids of the chain(s) finishing last
//! - **`deadline`**: suggested end date and effective deadline
//! - **`capacity`**: working days and hour capacity per member
//! - **`risk`**: capacity, sprint, calendar, carry-over and deadline risks

mod capacity;
mod critical_path;
mod deadline;
mod risk;

pub use capacity::{CapacityStats, MemberCapacity};
pub use critical_path::critical_path;
pub use deadline::{suggested_end_date, DeadlineInfo};
pub use risk::{Risk, RiskDetector, RiskKind};
