//! Ticket lifecycle management
//!
//! [`TicketManager`] is the only writer of the ticket store. It enforces the
//! status state machine:
//!
//! ```text
//! create ──► OPEN ──assign──► PROCESSING ◄──student reply── RESOLVED
//!              │                  │  ▲                        ▲
//!              └──── staff reply ─┴──┼────────────────────────┘
//!                                    │
//!                 set_status(CLOSED) ▼ set_status(any other) reopens
//!                                 CLOSED
//! ```
//!
//! The desk runs as a single writer; there is no locking around the
//! check-then-act sequence of duplicate suppression.

mod context;
mod manager;
mod outcome;

pub use context::{CurrentUser, DeskContext};
pub use manager::{DeskStats, NewTicket, TicketManager};
pub use outcome::{MAX_SUBJECT_LEN, Outcome, Rejection};
