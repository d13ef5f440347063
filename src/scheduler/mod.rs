//! Date propagation engine and its configuration.
//!
//! `Propagator` turns a task list plus a project configuration into a
//! [`Schedule`](crate::models::Schedule) by iterative relaxation to a fixed
//! point over the working-day calendar.
//!
//! # Anchors
//!
//! | Priority | Source | Start |
//! |----------|--------|-------|
//! | 1 | manual start | next working day on/after the date |
//! | 2 | settled predecessor | next working day on/after end + gap |
//! | 3 | sprint | next working day on/after sprint start |
//! | 4 | project | next working day on/after project start |
//!
//! The gap is 1 calendar day, or 3 when a frontend task follows a backend one.

mod options;
mod propagation;

pub use options::{DeadlineCheck, EngineOptions};
pub use propagation::Propagator;
