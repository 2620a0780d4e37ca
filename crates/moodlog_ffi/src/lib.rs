//! Flutter bridge crate for MoodLog core.

pub mod api;
