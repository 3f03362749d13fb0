use crate::core::{Ticket, TicketReply};
use crate::error::Result;
use crate::notify::{Notifier, Severity};
use colored::Colorize;
use serde::Serialize;

/// Formats command output as colored text or JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormatter {
    json: bool,
}

impl OutputFormatter {
    /// Create a formatter; `no_color` disables ANSI colors globally
    #[must_use]
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { json }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if self.json {
            eprintln!("{message}");
        } else {
            println!("{} {message}", "✓".green().bold());
        }
    }

    pub fn info(&self, message: &str) {
        if self.json {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {message}", "!".yellow().bold());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {message}", "✗".red().bold());
    }

    /// Print `value` as pretty JSON on stdout
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// One line per ticket
    pub fn ticket_line(&self, ticket: &Ticket) {
        let status = match ticket.status {
            crate::core::Status::Open => ticket.status.as_str().cyan(),
            crate::core::Status::Processing => ticket.status.as_str().yellow(),
            crate::core::Status::Resolved => ticket.status.as_str().green(),
            crate::core::Status::Closed => ticket.status.as_str().dimmed(),
        };
        let assignee = ticket
            .assigned_to_id
            .as_deref()
            .map(|a| format!(" → {a}"))
            .unwrap_or_default();
        println!(
            "{:<18} {} {:<10} {:<15} {} ({}){assignee}",
            ticket.ticket_number.as_str().bold(),
            ticket.id.short().as_str().dimmed(),
            status,
            ticket.category.label(),
            ticket.subject,
            ticket.student_name,
        );
    }

    /// Full ticket with its conversation
    pub fn ticket_detail(&self, ticket: &Ticket, replies: &[&TicketReply]) {
        println!("{} {}", ticket.ticket_number.as_str().bold(), ticket.subject.bold());
        println!("  Id:        {}", ticket.id);
        println!("  Student:   {} ({})", ticket.student_name, ticket.student_id);
        println!("  Category:  {}", ticket.category.label());
        println!("  Status:    {}", ticket.status.label());
        if let Some(assignee) = &ticket.assigned_to_id {
            println!("  Assignee:  {assignee}");
        }
        println!("  Created:   {}", ticket.created_at.format("%Y-%m-%d %H:%M"));
        println!("  Updated:   {}", ticket.updated_at.format("%Y-%m-%d %H:%M"));
        if let Some(closed_at) = ticket.closed_at {
            println!("  Closed:    {}", closed_at.format("%Y-%m-%d %H:%M"));
        }
        println!();
        println!("{}", ticket.content);

        for reply in replies {
            println!();
            println!(
                "{} {} [{}] {}",
                "—".dimmed(),
                reply.user_name.bold(),
                reply.user_role,
                reply.created_at.format("%Y-%m-%d %H:%M").to_string().as_str().dimmed()
            );
            println!("{}", reply.message);
        }
    }
}

impl Notifier for OutputFormatter {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => self.success(message),
            Severity::Info => self.info(message),
            Severity::Warning => self.warning(message),
            Severity::Error => self.error(message),
        }
    }
}
