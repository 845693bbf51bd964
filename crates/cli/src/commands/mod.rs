// Path: crates/cli/src/commands/mod.rs

pub mod import;
pub mod query;
pub mod record;
pub mod recorder;
pub mod student;
