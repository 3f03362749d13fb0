//! Handlers for the `ticket` subcommands
//!
//! Every mutation goes through [`TicketManager`], which notifies the user
//! through the formatter. The handlers add the CLI concerns on top: resolving
//! ticket references, staff-only gates and printing results.

use super::common::{HandlerContext, resolve_ticket_ref};
use crate::cli::commands::TicketCommands;
use crate::core::{Status, Ticket, UserRole};
use crate::error::{DeskError, Result};
use crate::lifecycle::{CurrentUser, NewTicket, Outcome};
use serde_json::json;

/// Dispatch a ticket subcommand
pub fn handle_ticket_command(command: TicketCommands, ctx: &HandlerContext) -> Result<()> {
    match command {
        TicketCommands::New {
            category,
            subject,
            content,
        } => handle_new(
            ctx,
            NewTicket {
                category,
                subject,
                content,
            },
        ),
        TicketCommands::Assign { ticket, to } => handle_assign(ctx, &ticket, to),
        TicketCommands::Reply { ticket, message } => handle_reply(ctx, &ticket, &message),
        TicketCommands::Status { ticket, status } => handle_status(ctx, &ticket, status),
        TicketCommands::Close { ticket } => handle_status(ctx, &ticket, Status::Closed),
        TicketCommands::Reopen { ticket } => handle_reopen(ctx, &ticket),
        TicketCommands::Inbox => {
            ctx.require_staff("view the inbox")?;
            let manager = ctx.ticket_manager()?;
            print_tickets(ctx, &manager.inbox(), "The inbox is empty")
        },
        TicketCommands::Mine => handle_mine(ctx),
        TicketCommands::Archive => {
            ctx.require_staff("view the archive")?;
            let manager = ctx.ticket_manager()?;
            print_tickets(ctx, &manager.archive(), "No closed tickets")
        },
        TicketCommands::Show { ticket } => handle_show(ctx, &ticket),
        TicketCommands::Stats => handle_stats(ctx),
    }
}

fn handle_new(ctx: &HandlerContext, draft: NewTicket) -> Result<()> {
    let mut manager = ctx.ticket_manager()?;
    let ticket = settle(manager.create(draft)?, "new ticket")?;

    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&ticket)?;
    } else {
        ctx.formatter.ticket_line(&ticket);
    }
    Ok(())
}

fn handle_assign(ctx: &HandlerContext, ticket_ref: &str, to: Option<String>) -> Result<()> {
    let user = ctx.require_staff("assign tickets")?;
    let admin_id = to.unwrap_or_else(|| user.id.clone());

    let mut manager = ctx.ticket_manager()?;
    let id = resolve_ticket_ref(&manager, ticket_ref)?;
    let ticket = settle(manager.assign(&id, &admin_id)?, ticket_ref)?;

    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&ticket)?;
    } else {
        ctx.formatter.info(&format!(
            "{} assigned to {admin_id} ({})",
            ticket.ticket_number,
            ticket.status.label()
        ));
    }
    Ok(())
}

fn handle_reply(ctx: &HandlerContext, ticket_ref: &str, message: &str) -> Result<()> {
    let mut manager = ctx.ticket_manager()?;
    let id = resolve_ticket_ref(&manager, ticket_ref)?;
    let ticket = manager.get(&id).ok_or_else(|| DeskError::TicketNotFound {
        id: ticket_ref.to_string(),
    })?;
    // without a user the manager itself refuses the reply
    if let Some(user) = &ctx.user {
        ensure_own_ticket(ctx, user, ticket, "reply to")?;
    }
    let reply = settle(manager.reply(&id, message)?, ticket_ref)?;

    if ctx.formatter.is_json() {
        let status = manager.get(&id).map(|t| t.status);
        ctx.formatter.print_json(&json!({
            "reply": reply,
            "ticketStatus": status,
        }))?;
    } else if let Some(ticket) = manager.get(&id) {
        ctx.formatter.info(&format!(
            "{} is now {}",
            ticket.ticket_number,
            ticket.status.label()
        ));
    }
    Ok(())
}

fn handle_status(ctx: &HandlerContext, ticket_ref: &str, status: Status) -> Result<()> {
    ctx.require_staff("change ticket status")?;

    let mut manager = ctx.ticket_manager()?;
    let id = resolve_ticket_ref(&manager, ticket_ref)?;
    let ticket = settle(manager.set_status(&id, status)?, ticket_ref)?;

    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&ticket)?;
    }
    Ok(())
}

fn handle_reopen(ctx: &HandlerContext, ticket_ref: &str) -> Result<()> {
    ctx.require_staff("reopen tickets")?;

    let manager = ctx.ticket_manager()?;
    let id = resolve_ticket_ref(&manager, ticket_ref)?;
    let current = manager
        .get(&id)
        .map(|t| t.status)
        .ok_or_else(|| DeskError::TicketNotFound {
            id: ticket_ref.to_string(),
        })?;
    if current != Status::Closed {
        return Err(DeskError::InvalidInput(format!(
            "{ticket_ref} is not closed (status: {})",
            current.label()
        )));
    }
    drop(manager);

    handle_status(ctx, ticket_ref, Status::Processing)
}

fn handle_mine(ctx: &HandlerContext) -> Result<()> {
    let user = ctx.require_user()?;
    let manager = ctx.ticket_manager()?;

    match ctx.role_of(user) {
        UserRole::Admin => print_tickets(ctx, &manager.my_tasks(&user.id), "No tickets assigned to you"),
        UserRole::Student => print_tickets(
            ctx,
            &manager.tickets_for_student(&user.id),
            "You have not submitted any inquiries",
        ),
    }
}

fn handle_show(ctx: &HandlerContext, ticket_ref: &str) -> Result<()> {
    let user = ctx.require_user()?;
    let manager = ctx.ticket_manager()?;
    let id = resolve_ticket_ref(&manager, ticket_ref)?;
    let ticket = manager.get(&id).ok_or_else(|| DeskError::TicketNotFound {
        id: ticket_ref.to_string(),
    })?;

    ensure_own_ticket(ctx, user, ticket, "view")?;

    let replies = manager.ticket_replies(&id);
    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&json!({
            "ticket": ticket,
            "replies": replies,
        }))?;
    } else {
        ctx.formatter.ticket_detail(ticket, &replies);
    }
    Ok(())
}

fn handle_stats(ctx: &HandlerContext) -> Result<()> {
    ctx.require_staff("view desk statistics")?;
    let stats = ctx.ticket_manager()?.stats();

    if ctx.formatter.is_json() {
        return ctx.formatter.print_json(&stats);
    }

    ctx.formatter.info(&format!("Total:       {}", stats.total));
    ctx.formatter.info(&format!("Open:        {}", stats.open));
    ctx.formatter.info(&format!("Processing:  {}", stats.processing));
    ctx.formatter.info(&format!("Resolved:    {}", stats.resolved));
    ctx.formatter.info(&format!("Closed:      {}", stats.closed));
    ctx.formatter.info(&format!("Unassigned:  {}", stats.unassigned));
    Ok(())
}

/// Students may only act on tickets they submitted
fn ensure_own_ticket(
    ctx: &HandlerContext,
    user: &CurrentUser,
    ticket: &Ticket,
    action: &str,
) -> Result<()> {
    if ctx.role_of(user) == UserRole::Student && ticket.student_id != user.id {
        return Err(DeskError::PermissionDenied(format!(
            "students can only {action} their own tickets"
        )));
    }
    Ok(())
}

fn print_tickets(ctx: &HandlerContext, tickets: &[&Ticket], empty_message: &str) -> Result<()> {
    if ctx.formatter.is_json() {
        return ctx.formatter.print_json(tickets);
    }

    if tickets.is_empty() {
        ctx.formatter.info(empty_message);
        return Ok(());
    }
    for ticket in tickets {
        ctx.formatter.ticket_line(ticket);
    }
    Ok(())
}

/// Turn a lifecycle outcome into a CLI result
fn settle<T>(outcome: Outcome<T>, ticket_ref: &str) -> Result<T> {
    match outcome {
        Outcome::Applied(value) => Ok(value),
        Outcome::Rejected(rejection) => Err(DeskError::Rejected(rejection.to_string())),
        Outcome::NotFound => Err(DeskError::TicketNotFound {
            id: ticket_ref.to_string(),
        }),
    }
}
