use crate::core::{ActionType, RiskLevel, SystemLog};
use crate::error::{DeskError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Parsing of the timestamp bounds accepted by [`AuditFilter`]
pub struct TimeBound;

impl TimeBound {
    /// Parse a lower bound. A bare date means the start of that day (UTC).
    pub fn parse_start(input: &str) -> Result<DateTime<Utc>> {
        Self::parse(input, NaiveTime::MIN)
    }

    /// Parse an upper bound. A bare date means the end of that day (UTC).
    pub fn parse_end(input: &str) -> Result<DateTime<Utc>> {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| DeskError::InvalidInput("Invalid end of day".to_string()))?;
        Self::parse(input, end_of_day)
    }

    fn parse(input: &str, time_for_date: NaiveTime) -> Result<DateTime<Utc>> {
        let input = input.trim();

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
            return Ok(timestamp.with_timezone(&Utc));
        }

        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(naive.and_utc());
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return Ok(date.and_time(time_for_date).and_utc());
        }

        Err(DeskError::InvalidInput(format!(
            "Invalid date: '{input}'. Use formats like '2024-01-15', '2024-01-15T08:30' or RFC 3339"
        )))
    }
}

/// Criteria for the filtered audit view
///
/// Every criterion left as `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Case-insensitive substring of the actor name or the target
    pub search: Option<String>,
    pub action: Option<ActionType>,
    pub risk: Option<RiskLevel>,
    /// Inclusive lower timestamp bound
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound
    pub until: Option<DateTime<Utc>>,
}

impl AuditFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then_some(term);
        self
    }

    #[must_use]
    pub fn action(mut self, action: ActionType) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub const fn risk(mut self, risk: RiskLevel) -> Self {
        self.risk = Some(risk);
        self
    }

    /// Set the lower bound from user input, see [`TimeBound::parse_start`]
    pub fn from_str_bound(mut self, input: &str) -> Result<Self> {
        self.from = Some(TimeBound::parse_start(input)?);
        Ok(self)
    }

    /// Set the upper bound from user input, see [`TimeBound::parse_end`]
    pub fn until_str_bound(mut self, input: &str) -> Result<Self> {
        self.until = Some(TimeBound::parse_end(input)?);
        Ok(self)
    }

    /// Matching entries, newest first
    pub fn apply<'a>(&self, logs: impl IntoIterator<Item = &'a SystemLog>) -> Vec<&'a SystemLog> {
        let needle = self.search.as_ref().map(|s| s.trim().to_lowercase());
        let mut matched: Vec<&SystemLog> = logs
            .into_iter()
            .filter(|log| self.matches(log, needle.as_deref()))
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched
    }

    fn matches(&self, log: &SystemLog, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !log.actor_name.to_lowercase().contains(needle)
                && !log.target.to_lowercase().contains(needle)
            {
                return false;
            }
        }

        if let Some(ref action) = self.action {
            if log.action_type != *action {
                return false;
            }
        }

        if let Some(risk) = self.risk {
            if log.risk_level != risk {
                return false;
            }
        }

        if let Some(from) = self.from {
            if log.timestamp < from {
                return false;
            }
        }

        if let Some(until) = self.until {
            if log.timestamp > until {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogStatus, SystemLogBuilder};
    use chrono::TimeZone;

    fn log_at(actor: &str, target: &str, action: ActionType, risk: RiskLevel, at: DateTime<Utc>) -> SystemLog {
        SystemLogBuilder::new(action)
            .actor(actor, "Staff")
            .target(target)
            .risk(risk)
            .status(LogStatus::Success)
            .timestamp(at)
            .build()
    }

    fn day(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn sample() -> Vec<SystemLog> {
        vec![
            log_at("Dana Reyes", "grades/2024", ActionType::Export, RiskLevel::High, day(10, 9)),
            log_at("Omar", "student:dana", ActionType::ViewSensitive, RiskLevel::Medium, day(12, 23)),
            log_at("Lee", "settings", ActionType::Update, RiskLevel::Low, day(13, 0)),
            log_at("Lee", "login", ActionType::Login, RiskLevel::Low, day(15, 8)),
        ]
    }

    #[test]
    fn test_default_filter_matches_all_newest_first() {
        let logs = sample();
        let view = AuditFilter::new().apply(&logs);
        assert_eq!(view.len(), 4);
        assert!(view.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn test_search_matches_actor_or_target_case_insensitive() {
        let logs = sample();
        let view = AuditFilter::new().search("DANA").apply(&logs);
        let actors: Vec<_> = view.iter().map(|l| l.actor_name.as_str()).collect();
        assert_eq!(actors, vec!["Omar", "Dana Reyes"]);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(AuditFilter::new().search("  ").search, None);
    }

    #[test]
    fn test_action_and_risk_filters_combine() {
        let logs = sample();
        let view = AuditFilter::new()
            .action(ActionType::Export)
            .risk(RiskLevel::High)
            .apply(&logs);
        assert_eq!(view.len(), 1);

        let view = AuditFilter::new()
            .action(ActionType::Export)
            .risk(RiskLevel::Low)
            .apply(&logs);
        assert!(view.is_empty());
    }

    #[test]
    fn test_date_only_end_bound_covers_whole_day() {
        let logs = sample();
        let view = AuditFilter::new()
            .from_str_bound("2024-01-12")
            .unwrap()
            .until_str_bound("2024-01-12")
            .unwrap()
            .apply(&logs);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].actor_name, "Omar");
    }

    #[test]
    fn test_bounds_with_time_are_exact() {
        let logs = sample();
        let view = AuditFilter::new()
            .until_str_bound("2024-01-12T22:00")
            .unwrap()
            .apply(&logs);
        assert_eq!(view.len(), 1);

        let view = AuditFilter::new()
            .from_str_bound("2024-01-13T00:00:00Z")
            .unwrap()
            .apply(&logs);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_invalid_bound() {
        assert!(TimeBound::parse_start("last tuesday").is_err());
        assert_eq!(
            TimeBound::parse_end("2024-02-29").unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
    }
}
