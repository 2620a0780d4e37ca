//! Reminder planning and scheduling.
//!
//! `planner` is pure time arithmetic; `scheduler` drives a
//! `NotificationSink` collaborator with the planned times.

pub mod notify;
pub mod planner;
pub mod scheduler;
