//! Audit log entry types
//!
//! Entries are produced by whichever subsystem performed the audited action.
//! The analyzer only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of audited action
///
/// The set is open-ended: actions this crate does not know about round-trip
/// through [`ActionType::Other`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Login,
    Logout,
    ViewSensitive,
    Update,
    Create,
    Delete,
    Export,
    AccessDenied,
    Other(String),
}

impl ActionType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::ViewSensitive => "VIEW_SENSITIVE",
            Self::Update => "UPDATE",
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Export => "EXPORT",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().replace('-', "_").as_str() {
            "LOGIN" => Self::Login,
            "LOGOUT" => Self::Logout,
            "VIEW_SENSITIVE" => Self::ViewSensitive,
            "UPDATE" => Self::Update,
            "CREATE" => Self::Create,
            "DELETE" => Self::Delete,
            "EXPORT" => Self::Export,
            "ACCESS_DENIED" => Self::AccessDenied,
            _ => Self::Other(value),
        }
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ActionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    Success,
    Warning,
    Failure,
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Failure => "FAILURE",
        })
    }
}

impl FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "failure" | "failed" => Ok(Self::Failure),
            _ => Err(format!(
                "Invalid log status: {s}. Must be one of: success, warning, failure"
            )),
        }
    }
}

/// Risk annotation carried by every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(format!(
                "Invalid risk level: {s}. Must be one of: low, medium, high, critical"
            )),
        }
    }
}

/// One field modified by an UPDATE action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// A single audit trail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor_name: String,
    pub role_name: String,
    pub ip: String,
    pub action_type: ActionType,
    pub target: String,
    pub status: LogStatus,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_known_and_unknown() {
        assert_eq!(ActionType::from("login".to_string()), ActionType::Login);
        assert_eq!(
            ActionType::from("access-denied".to_string()),
            ActionType::AccessDenied
        );
        let custom = ActionType::from("GRADE_OVERRIDE".to_string());
        assert_eq!(custom, ActionType::Other("GRADE_OVERRIDE".to_string()));
        assert_eq!(custom.to_string(), "GRADE_OVERRIDE");
    }

    #[test]
    fn test_system_log_wire_names() {
        let json = r#"{
            "id": "log-1",
            "timestamp": "2024-01-15T08:00:00Z",
            "actorName": "Dana",
            "roleName": "Registrar",
            "ip": "10.0.0.4",
            "actionType": "PASSWORD_RESET",
            "target": "user:42",
            "status": "WARNING",
            "riskLevel": "MEDIUM",
            "changes": [{"field": "email", "oldValue": "a@x", "newValue": "b@x"}]
        }"#;
        let log: SystemLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.action_type, ActionType::Other("PASSWORD_RESET".to_string()));
        assert_eq!(log.risk_level, RiskLevel::Medium);
        assert_eq!(log.changes[0].new_value, "b@x");
        assert!(log.details.is_none());

        let back = serde_json::to_value(&log).unwrap();
        assert_eq!(back["actionType"], "PASSWORD_RESET");
        assert_eq!(back["riskLevel"], "MEDIUM");
    }
}
