use crate::core::{Category, TicketNumber};
use std::fmt;

/// Longest accepted ticket subject, in characters
pub const MAX_SUBJECT_LEN: usize = 200;

/// Result of a lifecycle operation
///
/// Rejections and unknown ids are ordinary outcomes, not errors: the store is
/// left untouched and nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// The operation was applied and persisted
    Applied(T),
    /// The operation was refused; the user has been notified
    Rejected(Rejection),
    /// The referenced ticket does not exist
    NotFound,
}

impl<T> Outcome<T> {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// The applied value, if any
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Rejected(_) | Self::NotFound => None,
        }
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Applied(_) | Self::NotFound => None,
        }
    }
}

/// Why a lifecycle operation was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No current user
    Unauthenticated,
    /// The student already has an unclosed inquiry in this category
    DuplicateInquiry {
        category: Category,
        existing: TicketNumber,
    },
    /// A required text field is blank
    EmptyField(&'static str),
    /// The subject exceeds [`MAX_SUBJECT_LEN`]
    SubjectTooLong { len: usize },
    /// Closed tickets take no replies
    TicketClosed { ticket_number: TicketNumber },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "Sign in before submitting or replying"),
            Self::DuplicateInquiry { category, existing } => write!(
                f,
                "You already have an open {} inquiry ({existing}). Please wait for it to be closed",
                category.label().to_lowercase()
            ),
            Self::EmptyField(field) => write!(f, "The {field} cannot be empty"),
            Self::SubjectTooLong { len } => write!(
                f,
                "The subject is {len} characters long; the limit is {MAX_SUBJECT_LEN}"
            ),
            Self::TicketClosed { ticket_number } => {
                write!(f, "Ticket {ticket_number} is closed and cannot receive replies")
            },
        }
    }
}
