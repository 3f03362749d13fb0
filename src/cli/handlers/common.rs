use crate::audit::{AuditFilter, AuditLogStore};
use crate::cli::commands::AuditFilterArgs;
use crate::cli::output::OutputFormatter;
use crate::config::Config;
use crate::core::{ActionType, RiskLevel, TicketId, UserRole};
use crate::error::{DeskError, Result};
use crate::lifecycle::{CurrentUser, DeskContext, TicketManager};
use crate::storage::{CollectionStore, FileStorage};
use std::path::Path;

/// Common context for all handler operations
pub struct HandlerContext {
    pub config: Config,
    pub storage: FileStorage,
    pub user: Option<CurrentUser>,
    pub formatter: OutputFormatter,
}

impl HandlerContext {
    /// Load configuration and open the storage under `data_dir`
    pub fn new(
        data_dir: &Path,
        user: Option<CurrentUser>,
        formatter: OutputFormatter,
    ) -> Result<Self> {
        let config = Config::load(data_dir)?;
        Ok(Self {
            config,
            storage: FileStorage::new(data_dir),
            user,
            formatter,
        })
    }

    /// Lifecycle manager acting as the current user, notifying through the formatter
    pub fn ticket_manager(&self) -> Result<TicketManager<&FileStorage>> {
        let context = DeskContext::new(self.user.clone(), Box::new(self.formatter))
            .with_student_role(self.config.student_role_id.clone());
        TicketManager::load(&self.storage, context)
    }

    pub fn audit_store(&self) -> Result<AuditLogStore<&FileStorage>> {
        AuditLogStore::load(&self.storage)
    }

    /// The current user, or an error when nobody is signed in
    pub fn require_user(&self) -> Result<&CurrentUser> {
        self.user.as_ref().ok_or(DeskError::NotAuthenticated)
    }

    /// The current user, who must be staff
    pub fn require_staff(&self, action: &str) -> Result<&CurrentUser> {
        let user = self.require_user()?;
        if self.role_of(user) == UserRole::Student {
            return Err(DeskError::PermissionDenied(format!(
                "only staff can {action}"
            )));
        }
        Ok(user)
    }

    pub fn role_of(&self, user: &CurrentUser) -> UserRole {
        UserRole::for_role_id(&user.role_id, &self.config.student_role_id)
    }
}

/// Build the current user from the identity flags
///
/// The id is required; the display name falls back to the id.
pub fn current_user(
    user_id: Option<String>,
    user_name: Option<String>,
    role_id: String,
) -> Option<CurrentUser> {
    let id = user_id.filter(|id| !id.trim().is_empty())?;
    let name = user_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| id.clone());
    Some(CurrentUser::new(id, name, role_id))
}

/// Resolve a ticket reference: full id, ticket number, or id prefix
pub fn resolve_ticket_ref<S: CollectionStore>(
    manager: &TicketManager<S>,
    ticket_ref: &str,
) -> Result<TicketId> {
    let ticket_ref = ticket_ref.trim();

    if let Ok(id) = TicketId::parse_str(ticket_ref) {
        return Ok(id);
    }

    if let Some(ticket) = manager.find_by_number(ticket_ref) {
        return Ok(ticket.id);
    }

    if ticket_ref.len() >= 8 {
        let prefix = ticket_ref.to_lowercase();
        let matches: Vec<_> = manager
            .tickets()
            .iter()
            .filter(|t| t.id.to_string().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [ticket] => return Ok(ticket.id),
            [] => {},
            _ => {
                return Err(DeskError::AmbiguousTicket {
                    reference: ticket_ref.to_string(),
                    count: matches.len(),
                });
            },
        }
    }

    Err(DeskError::TicketNotFound {
        id: ticket_ref.to_string(),
    })
}

/// Turn the filter flags into an [`AuditFilter`]
pub fn build_audit_filter(args: &AuditFilterArgs) -> Result<AuditFilter> {
    let mut filter = AuditFilter::new();

    if let Some(search) = &args.search {
        filter = filter.search(search.clone());
    }
    if let Some(action) = args.action.as_deref().filter(|a| !is_wildcard(a)) {
        filter = filter.action(ActionType::from(action.to_string()));
    }
    if let Some(risk) = args.risk.as_deref().filter(|r| !is_wildcard(r)) {
        filter = filter.risk(risk.parse::<RiskLevel>().map_err(DeskError::InvalidInput)?);
    }
    if let Some(from) = &args.from {
        filter = filter.from_str_bound(from)?;
    }
    if let Some(to) = &args.to {
        filter = filter.until_str_bound(to)?;
    }

    Ok(filter)
}

fn is_wildcard(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("all")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_current_user_requires_id() {
        assert!(current_user(None, Some("Ada".into()), "student".into()).is_none());
        assert!(current_user(Some("  ".into()), None, "student".into()).is_none());

        let user = current_user(Some("s-1".into()), None, "student".into()).unwrap();
        assert_eq!(user.name, "s-1");
    }

    #[test]
    fn test_require_staff() {
        let temp_dir = TempDir::new().unwrap();
        let formatter = OutputFormatter::default();
        let student = current_user(Some("s-1".into()), None, "student".into());
        let ctx = HandlerContext::new(temp_dir.path(), student, formatter).unwrap();
        assert!(matches!(
            ctx.require_staff("assign tickets"),
            Err(DeskError::PermissionDenied(_))
        ));

        let staff = current_user(Some("a-1".into()), None, "registrar".into());
        let ctx = HandlerContext::new(temp_dir.path(), staff, formatter).unwrap();
        assert!(ctx.require_staff("assign tickets").is_ok());

        let ctx = HandlerContext::new(temp_dir.path(), None, formatter).unwrap();
        assert!(matches!(ctx.require_user(), Err(DeskError::NotAuthenticated)));
    }

    #[test]
    fn test_resolve_ticket_ref() {
        let temp_dir = TempDir::new().unwrap();
        let student = current_user(Some("s-1".into()), None, "student".into());
        let ctx = HandlerContext::new(temp_dir.path(), student, OutputFormatter::default()).unwrap();
        let mut manager = ctx.ticket_manager().unwrap();
        let ticket = manager
            .create(crate::lifecycle::NewTicket {
                category: crate::core::Category::Hours,
                subject: "Missing hours".to_string(),
                content: "My volunteer hours from May are missing".to_string(),
            })
            .unwrap()
            .applied()
            .unwrap();

        let full = ticket.id.to_string();
        assert_eq!(resolve_ticket_ref(&manager, &full).unwrap(), ticket.id);
        assert_eq!(
            resolve_ticket_ref(&manager, ticket.ticket_number.as_str()).unwrap(),
            ticket.id
        );
        assert_eq!(resolve_ticket_ref(&manager, &full[..8]).unwrap(), ticket.id);
        assert!(matches!(
            resolve_ticket_ref(&manager, "HRS-19990101-000"),
            Err(DeskError::TicketNotFound { .. })
        ));
    }

    #[test]
    fn test_build_audit_filter_wildcards() {
        let args = AuditFilterArgs {
            action: Some("ALL".to_string()),
            risk: Some("all".to_string()),
            ..AuditFilterArgs::default()
        };
        assert_eq!(build_audit_filter(&args).unwrap(), AuditFilter::new());

        let args = AuditFilterArgs {
            action: Some("export".to_string()),
            risk: Some("high".to_string()),
            to: Some("2024-01-31".to_string()),
            ..AuditFilterArgs::default()
        };
        let filter = build_audit_filter(&args).unwrap();
        assert_eq!(filter.action, Some(ActionType::Export));
        assert_eq!(filter.risk, Some(RiskLevel::High));
        assert!(filter.until.is_some());

        let args = AuditFilterArgs {
            risk: Some("severe".to_string()),
            ..AuditFilterArgs::default()
        };
        assert!(build_audit_filter(&args).is_err());
    }
}
