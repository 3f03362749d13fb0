use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a ticket
///
/// Primary key of the ticket store. Backed by a random v4 UUID so that ids
/// stay collision-free without consulting the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Generate a new random ticket id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a ticket id from its hyphenated string form
    pub fn parse_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// First eight characters, for compact display
    #[must_use]
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inquiry category chosen by the student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Scholarship,
    Hours,
    Payment,
    Counseling,
    Other,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Self; 5] = [
        Self::Scholarship,
        Self::Hours,
        Self::Payment,
        Self::Counseling,
        Self::Other,
    ];

    /// Three-letter prefix used in ticket numbers
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Scholarship => "SCH",
            Self::Hours => "HRS",
            Self::Payment => "PAY",
            Self::Counseling => "CSL",
            Self::Other => "OTH",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scholarship => "Scholarship",
            Self::Hours => "Service hours",
            Self::Payment => "Tuition payment",
            Self::Counseling => "Counseling",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scholarship => "SCHOLARSHIP",
            Self::Hours => "HOURS",
            Self::Payment => "PAYMENT",
            Self::Counseling => "COUNSELING",
            Self::Other => "OTHER",
        }
    }
}

/// Ticket number prefix for a raw category label
///
/// Used for records that did not go through [`Category`] parsing. Labels that
/// name no known category get the generic `GEN` prefix.
#[must_use]
pub fn prefix_for_label(label: &str) -> &'static str {
    label.parse::<Category>().map_or("GEN", Category::prefix)
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scholarship" | "sch" => Ok(Self::Scholarship),
            "hours" | "hrs" => Ok(Self::Hours),
            "payment" | "pay" => Ok(Self::Payment),
            "counseling" | "csl" => Ok(Self::Counseling),
            "other" | "oth" => Ok(Self::Other),
            _ => Err(format!(
                "Invalid category: {s}. Must be one of: {}",
                Self::ALL
                    .iter()
                    .map(|c| c.as_str().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Ticket status
///
/// `Open` is the initial state. `Closed` is terminal unless the ticket is
/// explicitly reopened.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Open,
    Processing,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::Open, Self::Processing, Self::Resolved, Self::Closed];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Processing => "Processing",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Processing => "PROCESSING",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "processing" | "in-progress" => Ok(Self::Processing),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(format!(
                "Invalid status: {s}. Must be one of: open, processing, resolved, closed"
            )),
        }
    }
}

/// Human readable ticket number, e.g. `SCH-20240115-042`
///
/// A display label only. Collisions are not checked; [`TicketId`] is the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

impl TicketNumber {
    /// Generate a number for a ticket of `category` created at `created_at`
    #[must_use]
    pub fn generate(category: Category, created_at: DateTime<Utc>) -> Self {
        let suffix: u16 = rand::thread_rng().gen_range(100..=999);
        Self::compose(category.prefix(), created_at, suffix)
    }

    fn compose(prefix: &str, created_at: DateTime<Utc>, suffix: u16) -> Self {
        Self(format!("{prefix}-{}-{suffix:03}", created_at.format("%Y%m%d")))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TicketNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A student inquiry tracked through the status lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub ticket_number: TicketNumber,
    pub student_id: String,
    pub student_name: String,
    pub category: Category,
    pub subject: String,
    pub content: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Whether the ticket still counts as an open inquiry for its student
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != Status::Closed
    }

    /// Whether the ticket is waiting in the shared inbox
    #[must_use]
    pub fn is_in_inbox(&self) -> bool {
        match self.status {
            Status::Open => true,
            Status::Processing => self.assigned_to_id.is_none(),
            Status::Resolved | Status::Closed => false,
        }
    }

    /// Move to `status`, keeping `closed_at` set exactly when closed
    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.closed_at = (status == Status::Closed).then_some(now);
        self.updated_at = now;
    }
}
