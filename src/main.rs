//! campus-desk - Student support desk CLI
//!
//! Parses command-line arguments, sets up logging and dispatches to the
//! command handlers.

use campus_desk::cli::handlers::{
    HandlerContext, current_user, handle_audit_command, handle_init, handle_ticket_command,
};
use campus_desk::cli::{Cli, Commands, OutputFormatter};
use campus_desk::error::{DeskError, Result};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Run the CLI application with the parsed arguments
///
/// # Errors
///
/// Returns any error that occurs during command execution
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { force } => handle_init(&cli.data_dir, force, formatter),
        Commands::Ticket { command } => {
            let user = current_user(cli.user_id, cli.user_name, cli.role);
            let ctx = HandlerContext::new(&cli.data_dir, user, *formatter)?;
            handle_ticket_command(command, &ctx)
        },
        Commands::Audit { command } => {
            let user = current_user(cli.user_id, cli.user_name, cli.role);
            let ctx = HandlerContext::new(&cli.data_dir, user, *formatter)?;
            handle_audit_command(command, &ctx)
        },
    }
}

/// Log to stderr; `--verbose` forces debug, otherwise `RUST_LOG` or warn
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_error(error: &DeskError, formatter: &OutputFormatter) {
    // Rejections were already shown by the notifier
    if !error.is_reported() {
        formatter.error(&error.user_message());
    }

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        formatter.warning("Suggestions:");
        for suggestion in &suggestions {
            eprintln!("  • {suggestion}");
        }
    }

    if formatter.is_json() {
        let _ = formatter.print_json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let _cli = Cli::parse_from(["campus-desk", "init"]);
        let _cli = Cli::parse_from(["campus-desk", "ticket", "inbox", "--role", "admin"]);
        let _cli = Cli::parse_from([
            "campus-desk",
            "ticket",
            "new",
            "--category",
            "hours",
            "--subject",
            "Missing hours",
            "--content",
            "May hours are missing",
        ]);
        let _cli = Cli::parse_from(["campus-desk", "audit", "list", "--risk", "all", "-l", "5"]);
    }

    #[test]
    fn test_record_role_does_not_clash_with_global_role() {
        let cli = Cli::parse_from([
            "campus-desk",
            "--role",
            "admin",
            "audit",
            "record",
            "--actor",
            "Kim",
            "--actor-role",
            "Staff",
            "--action",
            "login",
            "--target",
            "portal",
            "--risk",
            "medium",
        ]);
        assert_eq!(cli.role, "admin");
        assert!(matches!(cli.command, Commands::Audit { .. }));
    }
}
