//! CLI library components for the CI Load declaration compiler.

pub mod cli;
pub mod commands;
pub mod logging;
