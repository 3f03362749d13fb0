use crate::config::DEFAULT_DATA_DIR;
use crate::core::{Category, LogStatus, RiskLevel, Status};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Campus support desk: student inquiries and the security audit trail
#[derive(Parser, Debug)]
#[command(name = "campus-desk", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory holding tickets, replies, audit log and config
    #[arg(long, global = true, env = "CAMPUS_DESK_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Id of the signed-in user
    #[arg(long, global = true, env = "CAMPUS_DESK_USER_ID")]
    pub user_id: Option<String>,

    /// Display name of the signed-in user
    #[arg(long, global = true, env = "CAMPUS_DESK_USER_NAME")]
    pub user_name: Option<String>,

    /// Role id of the signed-in user
    #[arg(long, global = true, env = "CAMPUS_DESK_ROLE", default_value = "student")]
    pub role: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and a default config.yaml
    Init {
        /// Overwrite an existing config.yaml
        #[arg(long)]
        force: bool,
    },

    /// Submit and work on student inquiries
    Ticket {
        #[command(subcommand)]
        command: TicketCommands,
    },

    /// Review the security audit trail
    Audit {
        #[command(subcommand)]
        command: AuditCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum TicketCommands {
    /// Submit a new inquiry as the current student
    New {
        /// scholarship, hours, payment, counseling or other
        #[arg(short, long)]
        category: Category,

        #[arg(short, long)]
        subject: String,

        #[arg(long)]
        content: String,
    },

    /// Assign a ticket to a staff member
    Assign {
        /// Ticket number, id or id prefix
        ticket: String,

        /// Staff id to assign to (defaults to the current user)
        #[arg(long)]
        to: Option<String>,
    },

    /// Reply to a ticket as the current user
    Reply { ticket: String, message: String },

    /// Set a ticket's status explicitly
    Status { ticket: String, status: Status },

    /// Close a ticket
    Close { ticket: String },

    /// Reopen a closed ticket into processing
    Reopen { ticket: String },

    /// Tickets waiting for staff
    Inbox,

    /// Your tickets: assigned tasks for staff, submitted inquiries for students
    Mine,

    /// Closed tickets
    Archive,

    /// Show a ticket and its replies
    Show { ticket: String },

    /// Ticket counts per status
    Stats,
}

/// Filter flags shared by the audit views
#[derive(Args, Debug, Clone, Default)]
pub struct AuditFilterArgs {
    /// Substring of actor name or target
    #[arg(short, long)]
    pub search: Option<String>,

    /// Action type, or "all"
    #[arg(short, long)]
    pub action: Option<String>,

    /// Risk level, or "all"
    #[arg(short, long)]
    pub risk: Option<String>,

    /// Earliest timestamp (YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest timestamp; a bare date includes the whole day
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AuditCommands {
    /// List entries, newest first
    List {
        #[command(flatten)]
        filter: AuditFilterArgs,

        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Entries per day for the trailing days
    Trend,

    /// Entries per risk level
    Risk,

    /// Headline numbers for the filtered entries
    Kpis {
        #[command(flatten)]
        filter: AuditFilterArgs,
    },

    /// Run the anomaly heuristics
    Alerts,

    /// Export the filtered entries as CSV
    Export {
        #[command(flatten)]
        filter: AuditFilterArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append an entry to the audit log
    Record {
        #[arg(long)]
        actor: String,

        /// Role name of the actor
        #[arg(long)]
        actor_role: String,

        #[arg(long, default_value = "")]
        ip: String,

        #[arg(long)]
        action: String,

        #[arg(long)]
        target: String,

        #[arg(long, default_value = "success")]
        status: LogStatus,

        #[arg(long, default_value = "low")]
        risk: RiskLevel,

        #[arg(long)]
        details: Option<String>,

        #[arg(long)]
        user_agent: Option<String>,

        /// Changed field as FIELD:OLD:NEW (repeatable)
        #[arg(long = "change", value_name = "FIELD:OLD:NEW")]
        changes: Vec<String>,
    },
}
