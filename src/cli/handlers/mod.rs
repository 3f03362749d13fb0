//! Command handlers
//!
//! Each handler owns one command family. Shared plumbing such as loading the
//! configuration, resolving ticket references and staff checks lives in
//! [`common`].

mod audit;
pub mod common;
mod init;
mod ticket;

pub use audit::{RecordParams, handle_audit_command};
pub use common::{HandlerContext, current_user, resolve_ticket_ref};
pub use init::handle_init;
pub use ticket::handle_ticket_command;
