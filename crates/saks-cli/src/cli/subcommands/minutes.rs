use chrono::NaiveDate;
use clap::Subcommand;

/// Meeting minutes commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MinutesCommands {
    /// Create missing minutes and entries for a meeting's agenda.
    Ensure { meeting_id: i64 },
    /// Show a meeting's minutes.
    Show { meeting_id: i64 },
    /// Edit the minutes header. Pass an empty string to clear a text field.
    Update {
        meeting_id: i64,
        #[arg(long)]
        attendance: Option<String>,
        #[arg(long)]
        absence: Option<String>,
        /// Approval of the previous minutes
        #[arg(long)]
        approval: Option<String>,
        #[arg(long, conflicts_with = "clear_next_meeting_date")]
        next_meeting_date: Option<NaiveDate>,
        #[arg(long)]
        clear_next_meeting_date: bool,
        #[arg(long)]
        other_business: Option<String>,
    },
    /// Edit one minutes entry. Pass an empty string to clear a text field.
    UpdateEntry {
        entry_id: i64,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        decision: Option<String>,
        #[arg(long)]
        follow_up: Option<String>,
        /// continue, closed, deferred or info
        #[arg(long)]
        outcome: Option<String>,
    },
    /// Record the signed or scanned minutes of a meeting (PDF only).
    RecordSigned {
        meeting_id: i64,
        #[arg(long)]
        file_name: String,
        #[arg(long, default_value = "application/pdf")]
        content_type: String,
        #[arg(long)]
        size_bytes: i64,
    },
}
