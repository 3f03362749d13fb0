//! Audit trail analysis
//!
//! The [`AuditLogStore`] collects entries from any subsystem. The
//! [`AuditAnalyzer`] derives filtered views, the daily trend, the risk
//! distribution, KPIs and anomaly alerts from a snapshot of that store
//! without ever changing it.

mod analyzer;
pub mod export;
mod filter;
mod store;

pub use analyzer::{
    AlertKind, AnomalyAlert, AnomalyThresholds, AuditAnalyzer, AuditKpis, DayCount,
    RiskDistribution,
};
pub use filter::{AuditFilter, TimeBound};
pub use store::AuditLogStore;
