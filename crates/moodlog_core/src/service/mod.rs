//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, scheduler and aggregation calls into use-case APIs.
//! - Keep FFI/UI layers decoupled from storage details.

pub mod clock;
pub mod mood_service;
pub mod reminder_service;
