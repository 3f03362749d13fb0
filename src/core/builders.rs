use super::{
    ActionType, Category, FieldChange, LogStatus, RiskLevel, Status, SystemLog, Ticket, TicketId,
    TicketNumber,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    ticket_number: Option<TicketNumber>,
    student_id: Option<String>,
    student_name: Option<String>,
    category: Option<Category>,
    subject: Option<String>,
    content: Option<String>,
    status: Option<Status>,
    created_at: Option<DateTime<Utc>>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket number instead of generating one
    #[must_use]
    pub fn ticket_number(mut self, number: impl Into<String>) -> Self {
        self.ticket_number = Some(TicketNumber::from(number.into()));
        self
    }

    /// Set the submitting student
    #[must_use]
    pub fn student(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.student_id = Some(id.into());
        self.student_name = Some(name.into());
        self
    }

    /// Set the category
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the subject
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the content
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the ticket
    ///
    /// The ticket number is derived from category and creation time when not
    /// set explicitly. `closed_at` follows the status.
    pub fn build(self) -> Ticket {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let category = self.category.unwrap_or(Category::Other);
        let status = self.status.unwrap_or_default();
        Ticket {
            id: TicketId::new(),
            ticket_number: self
                .ticket_number
                .unwrap_or_else(|| TicketNumber::generate(category, created_at)),
            student_id: self.student_id.unwrap_or_default(),
            student_name: self.student_name.unwrap_or_default(),
            category,
            subject: self.subject.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            status,
            assigned_to_id: None,
            created_at,
            updated_at: created_at,
            closed_at: (status == Status::Closed).then_some(created_at),
        }
    }
}

/// Builder for creating SystemLog instances
pub struct SystemLogBuilder {
    timestamp: Option<DateTime<Utc>>,
    actor_name: String,
    role_name: String,
    ip: String,
    action_type: ActionType,
    target: String,
    status: LogStatus,
    risk_level: RiskLevel,
    details: Option<String>,
    user_agent: Option<String>,
    changes: Vec<FieldChange>,
}

impl SystemLogBuilder {
    /// Start an entry for `action_type` with a successful, low-risk outcome
    #[must_use]
    pub fn new(action_type: ActionType) -> Self {
        Self {
            timestamp: None,
            actor_name: String::new(),
            role_name: String::new(),
            ip: String::new(),
            action_type,
            target: String::new(),
            status: LogStatus::Success,
            risk_level: RiskLevel::Low,
            details: None,
            user_agent: None,
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the acting user and their role name
    #[must_use]
    pub fn actor(mut self, name: impl Into<String>, role: impl Into<String>) -> Self {
        self.actor_name = name.into();
        self.role_name = role.into();
        self
    }

    #[must_use]
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = ip.into();
        self
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    #[must_use]
    pub const fn status(mut self, status: LogStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Record one changed field
    #[must_use]
    pub fn change(
        mut self,
        field: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        self.changes.push(FieldChange {
            field: field.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        });
        self
    }

    /// Build the entry
    pub fn build(self) -> SystemLog {
        SystemLog {
            id: Uuid::new_v4().to_string(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            actor_name: self.actor_name,
            role_name: self.role_name,
            ip: self.ip,
            action_type: self.action_type,
            target: self.target,
            status: self.status,
            risk_level: self.risk_level,
            details: self.details,
            user_agent: self.user_agent,
            changes: self.changes,
        }
    }
}
