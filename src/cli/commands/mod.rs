//! Subcommand implementations

pub mod infer;
pub mod project;
