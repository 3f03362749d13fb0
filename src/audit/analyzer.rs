use super::filter::AuditFilter;
use crate::core::{ActionType, LogStatus, RiskLevel, SystemLog};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Count thresholds for the anomaly heuristics
///
/// An alert fires when its count is strictly greater than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    /// Failed LOGIN entries
    pub brute_force_threshold: usize,
    /// EXPORT entries inside the export window
    pub mass_export_threshold: usize,
    /// Length of the export window in milliseconds
    pub mass_export_window_ms: i64,
    /// CRITICAL entries
    pub critical_threshold: usize,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            brute_force_threshold: 3,
            mass_export_threshold: 2,
            mass_export_window_ms: 3_600_000,
            critical_threshold: 0,
        }
    }
}

/// Heuristic that raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BruteForce,
    MassExport,
    CriticalAction,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BruteForce => "brute_force",
            Self::MassExport => "mass_export",
            Self::CriticalAction => "critical_action",
        })
    }
}

/// Derived, non-persistent signal. Consumers decide how to respond.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyAlert {
    pub kind: AlertKind,
    pub severity: RiskLevel,
    pub count: usize,
    pub message: String,
}

/// Number of entries on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Entries per risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl RiskDistribution {
    pub fn from_entries<'a>(logs: impl IntoIterator<Item = &'a SystemLog>) -> Self {
        let mut distribution = Self::default();
        for log in logs {
            match log.risk_level {
                RiskLevel::Low => distribution.low += 1,
                RiskLevel::Medium => distribution.medium += 1,
                RiskLevel::High => distribution.high += 1,
                RiskLevel::Critical => distribution.critical += 1,
            }
        }
        distribution
    }

    #[must_use]
    pub const fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
            RiskLevel::Critical => self.critical,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

/// Headline numbers for a set of entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuditKpis {
    pub total: usize,
    pub failures: usize,
    pub warnings: usize,
    /// HIGH and CRITICAL entries
    pub high_risk: usize,
    pub distinct_actors: usize,
    pub distinct_ips: usize,
}

impl AuditKpis {
    pub fn from_entries<'a>(logs: impl IntoIterator<Item = &'a SystemLog>) -> Self {
        let mut kpis = Self::default();
        let mut actors = HashSet::new();
        let mut ips = HashSet::new();

        for log in logs {
            kpis.total += 1;
            match log.status {
                LogStatus::Failure => kpis.failures += 1,
                LogStatus::Warning => kpis.warnings += 1,
                LogStatus::Success => {},
            }
            if log.risk_level >= RiskLevel::High {
                kpis.high_risk += 1;
            }
            actors.insert(log.actor_name.as_str());
            if !log.ip.is_empty() {
                ips.insert(log.ip.as_str());
            }
        }

        kpis.distinct_actors = actors.len();
        kpis.distinct_ips = ips.len();
        kpis
    }
}

/// Longest window `trend` reports, in days
pub const MAX_TREND_DAYS: u32 = 366;

/// Read-only analysis over a snapshot of the audit log
///
/// Every view is recomputed on each call; nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct AuditAnalyzer<'a> {
    logs: &'a [SystemLog],
    thresholds: AnomalyThresholds,
}

impl<'a> AuditAnalyzer<'a> {
    #[must_use]
    pub fn new(logs: &'a [SystemLog]) -> Self {
        Self {
            logs,
            thresholds: AnomalyThresholds::default(),
        }
    }

    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: AnomalyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Entries matching `filter`, newest first
    #[must_use]
    pub fn filtered(&self, filter: &AuditFilter) -> Vec<&'a SystemLog> {
        filter.apply(self.logs)
    }

    /// Entries per day for the `days` calendar days ending on the day of `now`
    ///
    /// Days are taken in the timezone of `now`. Every day is present, oldest
    /// first, including days without entries. `days` is clamped to
    /// `1..=MAX_TREND_DAYS`.
    #[must_use]
    pub fn trend<Tz: TimeZone>(&self, now: &DateTime<Tz>, days: u32) -> Vec<DayCount> {
        let today = now.date_naive();
        let span = i64::from(days.clamp(1, MAX_TREND_DAYS));
        let start = today - Duration::days(span - 1);

        let mut buckets: Vec<DayCount> = (0..span)
            .map(|offset| DayCount {
                date: start + Duration::days(offset),
                count: 0,
            })
            .collect();

        let tz = now.timezone();
        for log in self.logs {
            let date = log.timestamp.with_timezone(&tz).date_naive();
            if date < start || date > today {
                continue;
            }
            let index = (date - start).num_days();
            if let Some(bucket) = usize::try_from(index).ok().and_then(|i| buckets.get_mut(i)) {
                bucket.count += 1;
            }
        }

        buckets
    }

    /// Entries per risk level over the whole log
    #[must_use]
    pub fn risk_distribution(&self) -> RiskDistribution {
        RiskDistribution::from_entries(self.logs)
    }

    /// Headline numbers over the entries matching `filter`
    #[must_use]
    pub fn kpis(&self, filter: &AuditFilter) -> AuditKpis {
        AuditKpis::from_entries(self.filtered(filter))
    }

    /// Evaluate the anomaly heuristics over the whole, unfiltered log
    #[must_use]
    pub fn detect_anomalies(&self, now: DateTime<Utc>) -> Vec<AnomalyAlert> {
        let thresholds = self.thresholds;
        let mut alerts = Vec::new();

        let failed_logins = self
            .logs
            .iter()
            .filter(|log| log.action_type == ActionType::Login && log.status == LogStatus::Failure)
            .count();
        if failed_logins > thresholds.brute_force_threshold {
            alerts.push(AnomalyAlert {
                kind: AlertKind::BruteForce,
                severity: RiskLevel::High,
                count: failed_logins,
                message: format!(
                    "Possible brute-force attack: {failed_logins} failed login attempts"
                ),
            });
        }

        let window_start = now - Duration::milliseconds(thresholds.mass_export_window_ms);
        let recent_exports = self
            .logs
            .iter()
            .filter(|log| log.action_type == ActionType::Export && log.timestamp > window_start)
            .count();
        if recent_exports > thresholds.mass_export_threshold {
            alerts.push(AnomalyAlert {
                kind: AlertKind::MassExport,
                severity: RiskLevel::High,
                count: recent_exports,
                message: format!(
                    "Unusual data export volume: {recent_exports} exports in the last {} minutes",
                    thresholds.mass_export_window_ms / 60_000
                ),
            });
        }

        let critical = self
            .logs
            .iter()
            .filter(|log| log.risk_level == RiskLevel::Critical)
            .count();
        if critical > thresholds.critical_threshold {
            alerts.push(AnomalyAlert {
                kind: AlertKind::CriticalAction,
                severity: RiskLevel::Critical,
                count: critical,
                message: format!("{critical} critical-risk actions recorded"),
            });
        }

        debug!(
            failed_logins,
            recent_exports,
            critical,
            alerts = alerts.len(),
            "anomaly detection finished"
        );
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{failed_login, log_entry};
    use chrono::{FixedOffset, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_trend_has_seven_zero_filled_days() {
        let now = now();
        let logs = vec![
            log_entry(ActionType::Login, RiskLevel::Low, now),
            log_entry(ActionType::Login, RiskLevel::Low, now - Duration::hours(2)),
            log_entry(ActionType::Update, RiskLevel::Low, now - Duration::days(2)),
            log_entry(ActionType::Update, RiskLevel::Low, now - Duration::days(7)),
        ];

        let trend = AuditAnalyzer::new(&logs).trend(&now, 7);
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2024, 5, 14).unwrap());
        assert_eq!(trend[6].date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());

        let counts: Vec<_> = trend.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_trend_on_empty_log() {
        let trend = AuditAnalyzer::new(&[]).trend(&now(), 7);
        assert_eq!(trend.len(), 7);
        assert!(trend.iter().all(|d| d.count == 0));
    }

    #[test]
    fn test_trend_window_is_clamped() {
        let analyzer = AuditAnalyzer::new(&[]);
        assert_eq!(analyzer.trend(&now(), 0).len(), 1);

        let trend = analyzer.trend(&now(), u32::MAX);
        assert_eq!(trend.len(), MAX_TREND_DAYS as usize);
        assert_eq!(trend[365].date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2023, 5, 21).unwrap());
    }

    #[test]
    fn test_trend_uses_timezone_of_now() {
        let utc_now = now();
        let late_evening = Utc.with_ymd_and_hms(2024, 5, 19, 23, 30, 0).unwrap();
        let logs = vec![log_entry(ActionType::Login, RiskLevel::Low, late_evening)];

        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let trend = AuditAnalyzer::new(&logs).trend(&utc_now.with_timezone(&seoul), 7);
        assert_eq!(trend[6].date, NaiveDate::from_ymd_opt(2024, 5, 21).unwrap());
        assert_eq!(trend[5].count, 1);
    }

    #[test]
    fn test_risk_distribution_sums_to_total() {
        let now = now();
        let logs = vec![
            log_entry(ActionType::Login, RiskLevel::Low, now),
            log_entry(ActionType::Login, RiskLevel::Low, now),
            log_entry(ActionType::Export, RiskLevel::High, now),
            log_entry(ActionType::Delete, RiskLevel::Critical, now),
        ];

        let distribution = AuditAnalyzer::new(&logs).risk_distribution();
        assert_eq!(distribution.get(RiskLevel::Low), 2);
        assert_eq!(distribution.get(RiskLevel::Medium), 0);
        assert_eq!(distribution.get(RiskLevel::High), 1);
        assert_eq!(distribution.get(RiskLevel::Critical), 1);
        assert_eq!(distribution.total(), logs.len());
    }

    #[test]
    fn test_brute_force_threshold_is_strict() {
        let now = now();
        let mut logs: Vec<_> = (0..3).map(|_| failed_login(now)).collect();
        assert!(AuditAnalyzer::new(&logs).detect_anomalies(now).is_empty());

        logs.push(failed_login(now));
        let alerts = AuditAnalyzer::new(&logs).detect_anomalies(now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::BruteForce);
        assert_eq!(alerts[0].count, 4);
    }

    #[test]
    fn test_successful_logins_do_not_count() {
        let now = now();
        let logs: Vec<_> = (0..10)
            .map(|_| log_entry(ActionType::Login, RiskLevel::Low, now))
            .collect();
        assert!(AuditAnalyzer::new(&logs).detect_anomalies(now).is_empty());
    }

    #[test]
    fn test_mass_export_window() {
        let now = now();
        let mut logs = vec![
            log_entry(ActionType::Export, RiskLevel::Medium, now - Duration::minutes(5)),
            log_entry(ActionType::Export, RiskLevel::Medium, now - Duration::minutes(30)),
            log_entry(ActionType::Export, RiskLevel::Medium, now - Duration::minutes(90)),
        ];
        assert!(AuditAnalyzer::new(&logs).detect_anomalies(now).is_empty());

        logs.push(log_entry(ActionType::Export, RiskLevel::Medium, now - Duration::minutes(59)));
        let alerts = AuditAnalyzer::new(&logs).detect_anomalies(now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::MassExport);
        assert_eq!(alerts[0].count, 3);
    }

    #[test]
    fn test_critical_action_alert() {
        let now = now();
        let logs = vec![log_entry(ActionType::Delete, RiskLevel::Critical, now - Duration::days(30))];
        let alerts = AuditAnalyzer::new(&logs).detect_anomalies(now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::CriticalAction);
        assert_eq!(alerts[0].severity, RiskLevel::Critical);
    }

    #[test]
    fn test_brute_force_without_mass_export() {
        let now = now();
        let mut logs: Vec<_> = (0..5).map(|_| failed_login(now - Duration::minutes(3))).collect();
        logs.push(log_entry(ActionType::Export, RiskLevel::Medium, now - Duration::minutes(10)));

        let alerts = AuditAnalyzer::new(&logs).detect_anomalies(now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::BruteForce);
        assert_eq!(alerts[0].count, 5);
    }

    #[test]
    fn test_custom_thresholds() {
        let now = now();
        let logs: Vec<_> = (0..2).map(|_| failed_login(now)).collect();
        let thresholds = AnomalyThresholds {
            brute_force_threshold: 1,
            ..AnomalyThresholds::default()
        };
        let alerts = AuditAnalyzer::new(&logs)
            .with_thresholds(thresholds)
            .detect_anomalies(now);
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_kpis_over_filtered_view() {
        let now = now();
        let mut logs = vec![
            failed_login(now),
            log_entry(ActionType::Export, RiskLevel::High, now),
            log_entry(ActionType::Delete, RiskLevel::Critical, now),
        ];
        logs[1].ip = "10.0.0.9".to_string();

        let analyzer = AuditAnalyzer::new(&logs);
        let all = analyzer.kpis(&AuditFilter::new());
        assert_eq!(all.total, 3);
        assert_eq!(all.failures, 1);
        assert_eq!(all.high_risk, 2);
        assert_eq!(all.distinct_ips, 2);

        let exports = analyzer.kpis(&AuditFilter::new().action(ActionType::Export));
        assert_eq!(exports.total, 1);
        assert_eq!(exports.failures, 0);
    }
}
