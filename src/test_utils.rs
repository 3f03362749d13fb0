//! Test utilities for campus-desk
//!
//! Common fixtures for the lifecycle and audit tests.

#![cfg(test)]

use crate::core::{
    ActionType, Category, LogStatus, RiskLevel, Status, SystemLog, SystemLogBuilder,
    TicketBuilder, TicketId,
};
use crate::lifecycle::{CurrentUser, DeskContext, NewTicket, TicketManager};
use crate::notify::{Notifier, Severity};
use crate::storage::MemoryStorage;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

/// Notifier that keeps every message for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<(String, Severity)>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.borrow().clone()
    }

    pub fn last_severity(&self) -> Option<Severity> {
        self.messages.borrow().last().map(|(_, severity)| *severity)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .borrow_mut()
            .push((message.to_string(), severity));
    }
}

/// A ticket manager over in-memory storage, acting as one user
pub struct TestDesk {
    pub manager: TicketManager<MemoryStorage>,
    pub notifications: RecordingNotifier,
}

impl TestDesk {
    pub fn as_user(user: CurrentUser) -> Self {
        let notifications = RecordingNotifier::default();
        let context = DeskContext::new(Some(user), Box::new(notifications.clone()));
        let manager =
            TicketManager::load(MemoryStorage::new(), context).expect("Failed to load manager");
        Self {
            manager,
            notifications,
        }
    }

    /// A manager sharing `storage` with other managers
    pub fn manager_for(storage: &MemoryStorage, user: CurrentUser) -> TicketManager<&MemoryStorage> {
        let context = DeskContext::new(Some(user), Box::new(RecordingNotifier::default()));
        TicketManager::load(storage, context).expect("Failed to load manager")
    }

    /// Put a ticket in the store without persisting or notifying
    pub fn seed_ticket(&mut self, student_id: &str, category: Category, status: Status) -> TicketId {
        let ticket = TicketBuilder::new()
            .student(student_id, format!("Student {student_id}"))
            .category(category)
            .subject(format!("{} question", category.label()))
            .content("Seeded for tests")
            .status(status)
            .build();
        let id = ticket.id;
        self.manager.insert_unsaved(ticket);
        id
    }
}

pub fn student(id: &str) -> CurrentUser {
    CurrentUser::new(id, format!("Student {id}"), "student")
}

pub fn admin(id: &str) -> CurrentUser {
    CurrentUser::new(id, format!("Admin {id}"), "staff")
}

pub fn draft(category: Category) -> NewTicket {
    NewTicket {
        category,
        subject: format!("Question about {}", category.label().to_lowercase()),
        content: "Could someone take a look at my record?".to_string(),
    }
}

/// A successful entry of `action` at `at`
pub fn log_entry(action: ActionType, risk: RiskLevel, at: DateTime<Utc>) -> SystemLog {
    SystemLogBuilder::new(action)
        .actor("Test Actor", "Staff")
        .ip("10.0.0.1")
        .target("test-target")
        .risk(risk)
        .timestamp(at)
        .build()
}

/// A failed LOGIN entry at `at`
pub fn failed_login(at: DateTime<Utc>) -> SystemLog {
    let mut log = log_entry(ActionType::Login, RiskLevel::Medium, at);
    log.status = LogStatus::Failure;
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::default();
        let handle = notifier.clone();
        notifier.notify("hello", Severity::Info);
        assert_eq!(handle.messages(), vec![("hello".to_string(), Severity::Info)]);
    }

    #[test]
    fn test_seed_ticket_does_not_persist() {
        let mut desk = TestDesk::as_user(admin("a-1"));
        let id = desk.seed_ticket("s-1", Category::Hours, Status::Resolved);
        assert_eq!(desk.manager.get(&id).unwrap().status, Status::Resolved);
        assert_eq!(desk.manager.storage().save_count(), 0);
    }
}
