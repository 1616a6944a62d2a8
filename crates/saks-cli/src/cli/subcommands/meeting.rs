use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Meeting and agenda commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MeetingCommands {
    /// Create a meeting.
    Create {
        #[arg(long)]
        date: NaiveDate,
        /// Meeting number within the year
        #[arg(long)]
        sequence: i32,
        /// Defaults to the year of --date
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        location: Option<String>,
    },
    /// List live meetings, latest first.
    List,
    /// Get a meeting by ID.
    Get { id: i64 },
    /// Show a meeting's agenda.
    Agenda { meeting_id: i64 },
    /// Put a case on a meeting's agenda.
    AddCase { meeting_id: i64, case_id: i64 },
    /// Swap an agenda item with its neighbour.
    Move {
        item_id: i64,
        #[arg(value_enum)]
        direction: MoveDirection,
    },
    /// Edit an agenda item. Pass an empty string to clear a text field.
    EditItem {
        item_id: i64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long, conflicts_with = "clear_deadline_date")]
        deadline_date: Option<NaiveDate>,
        #[arg(long)]
        clear_deadline_date: bool,
        #[arg(long)]
        deadline_text: Option<String>,
        #[arg(long)]
        follow_up: Option<String>,
    },
    /// Take an item off the agenda.
    RemoveItem { item_id: i64 },
    /// Soft-delete a meeting.
    Delete { id: i64 },
}
