use super::context::DeskContext;
use super::outcome::{MAX_SUBJECT_LEN, Outcome, Rejection};
use crate::core::{
    Category, ReplyId, Status, Ticket, TicketBuilder, TicketId, TicketReply, UserRole,
};
use crate::error::Result;
use crate::notify::Severity;
use crate::storage::{CollectionStore, REPLIES_KEY, TICKETS_KEY};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

/// Data a student supplies when submitting an inquiry
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub category: Category,
    pub subject: String,
    pub content: String,
}

/// Ticket counts shown on the staff dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeskStats {
    pub total: usize,
    pub open: usize,
    pub processing: usize,
    pub resolved: usize,
    pub closed: usize,
    pub unassigned: usize,
}

/// Owns the ticket store and enforces the ticket lifecycle
///
/// Every successful mutation persists both collections in full and emits a
/// notification. Operations on unknown ticket ids change nothing and return
/// [`Outcome::NotFound`]. `Err` is only returned when storage fails.
pub struct TicketManager<S: CollectionStore> {
    storage: S,
    context: DeskContext,
    tickets: Vec<Ticket>,
    replies: Vec<TicketReply>,
}

impl<S: CollectionStore> TicketManager<S> {
    /// Load the ticket and reply collections from `storage`
    pub fn load(storage: S, context: DeskContext) -> Result<Self> {
        let tickets: Vec<Ticket> = storage.load(TICKETS_KEY, Vec::new())?;
        let replies: Vec<TicketReply> = storage.load(REPLIES_KEY, Vec::new())?;
        debug!(tickets = tickets.len(), replies = replies.len(), "loaded ticket store");

        Ok(Self {
            storage,
            context,
            tickets,
            replies,
        })
    }

    pub const fn context(&self) -> &DeskContext {
        &self.context
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// All tickets in store order
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn get(&self, id: &TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == *id)
    }

    pub fn find_by_number(&self, number: &str) -> Option<&Ticket> {
        self.tickets
            .iter()
            .find(|t| t.ticket_number.as_str().eq_ignore_ascii_case(number))
    }

    /// Submit a new inquiry on behalf of the current user
    ///
    /// Rejected when nobody is signed in, when subject or content is blank,
    /// or when the student already has an unclosed ticket in the category.
    pub fn create(&mut self, draft: NewTicket) -> Result<Outcome<Ticket>> {
        let Some(user) = self.context.user().cloned() else {
            return Ok(self.reject(Rejection::Unauthenticated, Severity::Error));
        };

        if let Some(rejection) = validate_draft(&draft) {
            return Ok(self.reject(rejection, Severity::Warning));
        }

        if let Some(existing) = self.tickets.iter().find(|t| {
            t.student_id == user.id && t.category == draft.category && t.is_active()
        }) {
            let rejection = Rejection::DuplicateInquiry {
                category: draft.category,
                existing: existing.ticket_number.clone(),
            };
            return Ok(self.reject(rejection, Severity::Warning));
        }

        let ticket = TicketBuilder::new()
            .student(user.id, user.name)
            .category(draft.category)
            .subject(draft.subject.trim())
            .content(draft.content.trim())
            .status(Status::Open)
            .build();

        self.tickets.push(ticket.clone());
        self.persist()?;

        info!(ticket = %ticket.ticket_number, category = %ticket.category, "ticket created");
        self.context.notify(
            &format!("Inquiry {} submitted", ticket.ticket_number),
            Severity::Success,
        );
        Ok(Outcome::Applied(ticket))
    }

    /// Assign a ticket to a staff member
    ///
    /// An OPEN ticket moves to PROCESSING. Re-assigning to the same admin is
    /// allowed and applies the same rule.
    pub fn assign(&mut self, id: &TicketId, admin_id: &str) -> Result<Outcome<Ticket>> {
        let now = Utc::now();
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == *id) else {
            debug!(%id, "assign: ticket not found");
            return Ok(Outcome::NotFound);
        };

        ticket.assigned_to_id = Some(admin_id.to_string());
        if ticket.status == Status::Open {
            ticket.set_status(Status::Processing, now);
        } else {
            ticket.updated_at = now;
        }
        let ticket = ticket.clone();
        self.persist()?;

        info!(ticket = %ticket.ticket_number, admin = admin_id, status = %ticket.status, "ticket assigned");
        self.context.notify(
            &format!("Ticket {} assigned to {admin_id}", ticket.ticket_number),
            Severity::Success,
        );
        Ok(Outcome::Applied(ticket))
    }

    /// Append a reply from the current user
    ///
    /// The new status depends only on who replied: staff replies resolve the
    /// ticket, student replies put it back into processing. Closed tickets
    /// refuse replies.
    pub fn reply(&mut self, id: &TicketId, message: &str) -> Result<Outcome<TicketReply>> {
        let Some(user) = self.context.user().cloned() else {
            return Ok(self.reject(Rejection::Unauthenticated, Severity::Error));
        };
        let role = self.context.role_of(&user);

        let Some(index) = self.tickets.iter().position(|t| t.id == *id) else {
            debug!(%id, "reply: ticket not found");
            self.context
                .notify("The ticket you replied to no longer exists", Severity::Warning);
            return Ok(Outcome::NotFound);
        };

        if self.tickets[index].status == Status::Closed {
            let rejection = Rejection::TicketClosed {
                ticket_number: self.tickets[index].ticket_number.clone(),
            };
            return Ok(self.reject(rejection, Severity::Warning));
        }
        if message.trim().is_empty() {
            return Ok(self.reject(Rejection::EmptyField("message"), Severity::Warning));
        }

        let now = Utc::now();
        let reply = TicketReply {
            id: ReplyId::new(),
            ticket_id: *id,
            user_id: user.id,
            user_name: user.name,
            user_role: role,
            message: message.trim().to_string(),
            created_at: now,
        };
        self.replies.push(reply.clone());

        let next = match role {
            UserRole::Admin => Status::Resolved,
            UserRole::Student => Status::Processing,
        };
        let ticket = &mut self.tickets[index];
        ticket.set_status(next, now);
        let ticket_number = ticket.ticket_number.clone();
        self.persist()?;

        info!(ticket = %ticket_number, %role, status = %next, "reply added");
        self.context
            .notify(&format!("Reply sent on {ticket_number}"), Severity::Success);
        Ok(Outcome::Applied(reply))
    }

    /// Set the status explicitly, used for closing and reopening
    ///
    /// Closing stamps `closed_at`; any other status clears it.
    pub fn set_status(&mut self, id: &TicketId, status: Status) -> Result<Outcome<Ticket>> {
        let now = Utc::now();
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == *id) else {
            debug!(%id, "set_status: ticket not found");
            return Ok(Outcome::NotFound);
        };

        let previous = ticket.status;
        ticket.set_status(status, now);
        let ticket = ticket.clone();
        self.persist()?;

        info!(ticket = %ticket.ticket_number, from = %previous, to = %status, "status changed");
        self.context.notify(
            &format!("Ticket {} marked {}", ticket.ticket_number, status.label()),
            Severity::Success,
        );
        Ok(Outcome::Applied(ticket))
    }

    /// Tickets waiting for staff: OPEN, or PROCESSING without an assignee
    pub fn inbox(&self) -> Vec<&Ticket> {
        self.newest_first(Ticket::is_in_inbox)
    }

    /// Unclosed tickets assigned to `user_id`
    pub fn my_tasks(&self, user_id: &str) -> Vec<&Ticket> {
        self.newest_first(|t| t.is_active() && t.assigned_to_id.as_deref() == Some(user_id))
    }

    /// Closed tickets
    pub fn archive(&self) -> Vec<&Ticket> {
        self.newest_first(|t| t.status == Status::Closed)
    }

    /// Every ticket submitted by `student_id`
    pub fn tickets_for_student(&self, student_id: &str) -> Vec<&Ticket> {
        self.newest_first(|t| t.student_id == student_id)
    }

    /// Replies on one ticket, oldest first
    pub fn ticket_replies(&self, id: &TicketId) -> Vec<&TicketReply> {
        let mut replies: Vec<_> = self.replies.iter().filter(|r| r.ticket_id == *id).collect();
        replies.sort_by_key(|r| r.created_at);
        replies
    }

    pub fn stats(&self) -> DeskStats {
        let mut stats = DeskStats {
            total: self.tickets.len(),
            ..DeskStats::default()
        };
        for ticket in &self.tickets {
            match ticket.status {
                Status::Open => stats.open += 1,
                Status::Processing => stats.processing += 1,
                Status::Resolved => stats.resolved += 1,
                Status::Closed => stats.closed += 1,
            }
            if ticket.is_active() && ticket.assigned_to_id.is_none() {
                stats.unassigned += 1;
            }
        }
        stats
    }

    #[cfg(test)]
    pub(crate) fn insert_unsaved(&mut self, ticket: Ticket) {
        self.tickets.push(ticket);
    }

    fn newest_first(&self, predicate: impl Fn(&Ticket) -> bool) -> Vec<&Ticket> {
        let mut tickets: Vec<_> = self.tickets.iter().filter(|t| predicate(t)).collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }

    fn reject<T>(&self, rejection: Rejection, severity: Severity) -> Outcome<T> {
        debug!(%rejection, "operation rejected");
        self.context.notify(&rejection.to_string(), severity);
        Outcome::Rejected(rejection)
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(TICKETS_KEY, &self.tickets)?;
        self.storage.save(REPLIES_KEY, &self.replies)
    }
}

fn validate_draft(draft: &NewTicket) -> Option<Rejection> {
    let subject = draft.subject.trim();
    if subject.is_empty() {
        return Some(Rejection::EmptyField("subject"));
    }
    let len = subject.chars().count();
    if len > MAX_SUBJECT_LEN {
        return Some(Rejection::SubjectTooLong { len });
    }
    if draft.content.trim().is_empty() {
        return Some(Rejection::EmptyField("content"));
    }
    None
}
