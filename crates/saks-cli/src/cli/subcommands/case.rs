use chrono::NaiveDate;
use clap::Subcommand;

/// Board case commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CaseCommands {
    /// Create a case with the next case number.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        /// p1, p2 or p3
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, default_value = "")]
        assignee: String,
        /// Defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,
        #[arg(long)]
        deadline_date: Option<NaiveDate>,
        #[arg(long)]
        deadline_text: Option<String>,
    },
    /// Update a case. Pass an empty string to clear a text field.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// open or closed
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        closed_date: Option<NaiveDate>,
        #[arg(long)]
        deadline_date: Option<NaiveDate>,
        #[arg(long)]
        deadline_text: Option<String>,
    },
    /// Soft-delete a case.
    Delete { id: i64 },
    /// List live cases, open ones unless told otherwise.
    List {
        /// Include closed cases
        #[arg(long, conflicts_with = "status")]
        all: bool,
        /// open or closed
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Get a case by ID.
    Get { id: i64 },
    /// Comments and minutes entries of a case, newest first.
    Timeline { id: i64 },
}
