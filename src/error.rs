//! Error types for campus-desk
//!
//! Lifecycle outcomes such as a duplicate inquiry or an unknown ticket id are
//! not errors; they are reported through [`crate::lifecycle::Outcome`]. The
//! variants here cover the storage collaborator, serialization, configuration
//! and the CLI surface.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeskError>;

/// Main error type for campus-desk
#[derive(Error, Debug)]
pub enum DeskError {
    /// I/O error from the file-backed storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A ticket reference could not be resolved
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    /// A ticket reference matched more than one ticket
    #[error("Ambiguous ticket reference '{reference}' matches {count} tickets")]
    AmbiguousTicket { reference: String, count: usize },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// No current user was supplied
    #[error("Not signed in")]
    NotAuthenticated,

    /// The current user may not perform the action
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A lifecycle operation was refused; the user has already been told why
    #[error("{0}")]
    Rejected(String),

    /// Any other error
    #[error("{0}")]
    Custom(String),
}

impl DeskError {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Message shown to the operator
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TicketNotFound { id } => format!("No ticket matches '{id}'"),
            Self::NotAuthenticated => {
                "No current user. Pass --user-id and --user-name (or set CAMPUS_DESK_USER_ID)"
                    .to_string()
            },
            _ => self.to_string(),
        }
    }

    /// Hints for fixing the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TicketNotFound { .. } => vec![
                "Use 'campus-desk ticket inbox' or 'ticket mine' to list tickets".to_string(),
                "Reference a ticket by number (e.g. SCH-20240115-042) or id prefix".to_string(),
            ],
            Self::AmbiguousTicket { .. } => {
                vec!["Use the full ticket id or the ticket number".to_string()]
            },
            Self::NotAuthenticated => vec![
                "Set CAMPUS_DESK_USER_ID, CAMPUS_DESK_USER_NAME and CAMPUS_DESK_ROLE".to_string(),
            ],
            Self::PermissionDenied(_) => {
                vec!["Run the command as a staff user (--role admin)".to_string()]
            },
            Self::Config(_) => vec![
                "Check <data-dir>/config.yaml for syntax errors".to_string(),
                "Check CAMPUS_DESK__* environment variables".to_string(),
            ],
            Self::Yaml(_) => vec!["A data file may be corrupted; inspect the data directory".to_string()],
            _ => vec![],
        }
    }

    /// Whether retrying the user action may succeed
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Yaml(_) | Self::Config(_))
    }

    /// Whether the user has already seen this error through a notification
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Whether the error originates from configuration
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_missing_ticket() {
        let err = DeskError::TicketNotFound {
            id: "SCH-20240115-042".to_string(),
        };
        assert_eq!(err.user_message(), "No ticket matches 'SCH-20240115-042'");
        assert_eq!(err.suggestions().len(), 2);
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(DeskError::NotAuthenticated.is_recoverable());
        assert!(DeskError::custom("boom").is_recoverable());
        let yaml_err = serde_yaml::from_str::<u32>("[").unwrap_err();
        assert!(!DeskError::from(yaml_err).is_recoverable());
    }
}
