//! Core entities of the support desk
//!
//! Tickets and their replies are owned by the lifecycle manager; audit log
//! entries are produced elsewhere and only read by the analyzer.

mod audit;
mod builders;
mod reply;
mod ticket;

pub use audit::{ActionType, FieldChange, LogStatus, RiskLevel, SystemLog};
pub use builders::{SystemLogBuilder, TicketBuilder};
pub use reply::{ReplyId, TicketReply, UserRole};
pub use ticket::{Category, Status, Ticket, TicketId, TicketNumber, prefix_for_label};
