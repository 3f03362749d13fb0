//! Handlers for the `audit` subcommands

use super::common::{HandlerContext, build_audit_filter};
use crate::audit::{AuditAnalyzer, export};
use crate::cli::commands::AuditCommands;
use crate::core::{ActionType, LogStatus, RiskLevel, SystemLog, SystemLogBuilder};
use crate::error::{DeskError, Result};
use chrono::{Local, Utc};
use colored::Colorize;
use std::fs;

/// Parameters for recording an audit entry
pub struct RecordParams {
    pub actor: String,
    pub actor_role: String,
    pub ip: String,
    pub action: String,
    pub target: String,
    pub status: LogStatus,
    pub risk: RiskLevel,
    pub details: Option<String>,
    pub user_agent: Option<String>,
    pub changes: Vec<String>,
}

/// Dispatch an audit subcommand
///
/// Recording needs no user; every view is staff-only.
pub fn handle_audit_command(command: AuditCommands, ctx: &HandlerContext) -> Result<()> {
    match command {
        AuditCommands::Record {
            actor,
            actor_role,
            ip,
            action,
            target,
            status,
            risk,
            details,
            user_agent,
            changes,
        } => handle_record(
            ctx,
            RecordParams {
                actor,
                actor_role,
                ip,
                action,
                target,
                status,
                risk,
                details,
                user_agent,
                changes,
            },
        ),
        AuditCommands::List { filter, limit } => with_analyzer(ctx, |analyzer| {
            let mut entries = analyzer.filtered(&build_audit_filter(&filter)?);
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            print_entries(ctx, &entries)
        }),
        AuditCommands::Trend => with_analyzer(ctx, |analyzer| {
            let trend = analyzer.trend(&Local::now(), ctx.config.trend_days);
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&trend);
            }
            let peak = trend.iter().map(|d| d.count).max().unwrap_or(0).max(1);
            for day in &trend {
                let width = day.count * 30 / peak;
                ctx.formatter.info(&format!(
                    "{}  {:>5}  {}",
                    day.date.format("%m/%d"),
                    day.count,
                    "█".repeat(width).as_str().blue()
                ));
            }
            Ok(())
        }),
        AuditCommands::Risk => with_analyzer(ctx, |analyzer| {
            let distribution = analyzer.risk_distribution();
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&distribution);
            }
            for level in RiskLevel::ALL {
                ctx.formatter
                    .info(&format!("{:<9} {}", level.as_str(), distribution.get(level)));
            }
            Ok(())
        }),
        AuditCommands::Kpis { filter } => with_analyzer(ctx, |analyzer| {
            let kpis = analyzer.kpis(&build_audit_filter(&filter)?);
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&kpis);
            }
            ctx.formatter.info(&format!("Entries:          {}", kpis.total));
            ctx.formatter.info(&format!("Failures:         {}", kpis.failures));
            ctx.formatter.info(&format!("Warnings:         {}", kpis.warnings));
            ctx.formatter.info(&format!("High risk:        {}", kpis.high_risk));
            ctx.formatter.info(&format!("Distinct actors:  {}", kpis.distinct_actors));
            ctx.formatter.info(&format!("Distinct IPs:     {}", kpis.distinct_ips));
            Ok(())
        }),
        AuditCommands::Alerts => with_analyzer(ctx, |analyzer| {
            let alerts = analyzer.detect_anomalies(Utc::now());
            if ctx.formatter.is_json() {
                return ctx.formatter.print_json(&alerts);
            }
            if alerts.is_empty() {
                ctx.formatter.success("No anomalies detected");
            }
            for alert in &alerts {
                ctx.formatter.warning(&format!("[{}] {}", alert.severity, alert.message));
            }
            Ok(())
        }),
        AuditCommands::Export { filter, output } => with_analyzer(ctx, |analyzer| {
            let entries = analyzer.filtered(&build_audit_filter(&filter)?);
            let csv = export::to_csv(entries.iter().copied())?;
            match output {
                Some(path) => {
                    fs::write(&path, csv)?;
                    ctx.formatter.success(&format!(
                        "Exported {} entries to {}",
                        entries.len(),
                        path.display()
                    ));
                },
                None => print!("{csv}"),
            }
            Ok(())
        }),
    }
}

/// Run `view` over the audit log as a staff member
fn with_analyzer<F>(ctx: &HandlerContext, view: F) -> Result<()>
where
    F: FnOnce(&AuditAnalyzer<'_>) -> Result<()>,
{
    ctx.require_staff("review the audit log")?;
    let store = ctx.audit_store()?;
    let analyzer = AuditAnalyzer::new(store.entries()).with_thresholds(ctx.config.anomaly);
    view(&analyzer)
}

fn handle_record(ctx: &HandlerContext, params: RecordParams) -> Result<()> {
    if params.actor.trim().is_empty() || params.target.trim().is_empty() {
        return Err(DeskError::InvalidInput(
            "actor and target are required".to_string(),
        ));
    }

    let mut builder = SystemLogBuilder::new(ActionType::from(params.action))
        .actor(params.actor, params.actor_role)
        .ip(params.ip)
        .target(params.target)
        .status(params.status)
        .risk(params.risk);
    if let Some(details) = params.details {
        builder = builder.details(details);
    }
    if let Some(user_agent) = params.user_agent {
        builder = builder.user_agent(user_agent);
    }
    for change in &params.changes {
        let (field, old_value, new_value) = parse_change(change)?;
        builder = builder.change(field, old_value, new_value);
    }
    let entry = builder.build();

    let mut store = ctx.audit_store()?;
    store.append(entry.clone())?;

    if ctx.formatter.is_json() {
        ctx.formatter.print_json(&entry)?;
    } else {
        ctx.formatter.success(&format!(
            "Recorded {} on {} ({} entries)",
            entry.action_type,
            entry.target,
            store.len()
        ));
    }
    Ok(())
}

/// Split `FIELD:OLD:NEW`; the new value may itself contain colons
fn parse_change(input: &str) -> Result<(&str, &str, &str)> {
    let mut parts = input.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(old_value), Some(new_value)) if !field.trim().is_empty() => {
            Ok((field.trim(), old_value, new_value))
        },
        _ => Err(DeskError::InvalidInput(format!(
            "Invalid change '{input}'. Use FIELD:OLD:NEW"
        ))),
    }
}

fn print_entries(ctx: &HandlerContext, entries: &[&SystemLog]) -> Result<()> {
    if ctx.formatter.is_json() {
        return ctx.formatter.print_json(entries);
    }
    if entries.is_empty() {
        ctx.formatter.info("No matching audit entries");
        return Ok(());
    }

    for log in entries {
        let risk = match log.risk_level {
            RiskLevel::Low => log.risk_level.as_str().normal(),
            RiskLevel::Medium => log.risk_level.as_str().yellow(),
            RiskLevel::High => log.risk_level.as_str().red(),
            RiskLevel::Critical => log.risk_level.as_str().red().bold(),
        };
        ctx.formatter.info(&format!(
            "{}  {:<8} {:<15} {:<14} {:<20} {:<8} {}",
            log.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            risk,
            log.actor_name,
            log.action_type.as_str(),
            log.target,
            log.status.to_string(),
            log.ip,
        ));
    }
    Ok(())
}
