//! campus-desk - Student support desk with a security audit trail
//!
//! This crate provides two loosely coupled halves:
//! - A ticket lifecycle for student inquiries (submission, assignment,
//!   replies, status changes) with one open inquiry per student and category
//! - Read-only analysis of the system audit log: filtering, a daily activity
//!   trend, risk distribution, KPIs, anomaly alerts and CSV export
//!
//! Both halves persist whole collections through a [`storage::CollectionStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use campus_desk::core::Category;
//! use campus_desk::lifecycle::{CurrentUser, DeskContext, NewTicket, TicketManager};
//! use campus_desk::notify::TracingNotifier;
//! use campus_desk::storage::FileStorage;
//!
//! let user = CurrentUser::new("2024-001", "Kim Minji", "student");
//! let context = DeskContext::new(Some(user), Box::new(TracingNotifier));
//! let mut desk = TicketManager::load(FileStorage::new(".campus-desk"), context)?;
//!
//! let outcome = desk.create(NewTicket {
//!     category: Category::Scholarship,
//!     subject: "Spring payout".to_string(),
//!     content: "The spring scholarship has not arrived".to_string(),
//! })?;
//! ```

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]

pub mod audit;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{DeskError, Result};
