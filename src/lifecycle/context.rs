use crate::config::DEFAULT_STUDENT_ROLE;
use crate::core::UserRole;
use crate::notify::{Notifier, Severity};
use serde::{Deserialize, Serialize};

/// The signed-in user, as supplied by the identity collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role_id: String,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role_id: role_id.into(),
        }
    }
}

/// Everything the lifecycle manager needs from its surroundings
///
/// Passed in at construction so the manager never reaches for global state.
pub struct DeskContext {
    user: Option<CurrentUser>,
    notifier: Box<dyn Notifier>,
    student_role_id: String,
}

impl DeskContext {
    pub fn new(user: Option<CurrentUser>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            user,
            notifier,
            student_role_id: DEFAULT_STUDENT_ROLE.to_string(),
        }
    }

    /// Use `role_id` instead of the default to recognise students
    #[must_use]
    pub fn with_student_role(mut self, role_id: impl Into<String>) -> Self {
        self.student_role_id = role_id.into();
        self
    }

    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Desk role of `user`
    #[must_use]
    pub fn role_of(&self, user: &CurrentUser) -> UserRole {
        UserRole::for_role_id(&user.role_id, &self.student_role_id)
    }

    pub fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity);
    }
}

impl std::fmt::Debug for DeskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskContext")
            .field("user", &self.user)
            .field("notifier", &"Box<dyn Notifier>")
            .field("student_role_id", &self.student_role_id)
            .finish()
    }
}
