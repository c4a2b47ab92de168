//! CLI library components for the migration engine.

pub mod logging;
