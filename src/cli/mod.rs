//! Command-line interface for campus-desk

mod commands;
pub mod handlers;
mod output;

pub use commands::{AuditCommands, AuditFilterArgs, Cli, Commands, TicketCommands};
pub use output::OutputFormatter;
