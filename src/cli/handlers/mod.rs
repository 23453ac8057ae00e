//! Command handlers for CLI operations
//!
//! Execution logic for each subcommand, kept apart from parsing and merging.

pub mod check_db;
pub mod serve;

pub use check_db::CheckDbCommandHandler;
pub use serve::ServeCommandHandler;
