use clap::Subcommand;

/// PDF version numbering commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PdfCommands {
    /// Reserve the next version number for a meeting document.
    Allocate {
        meeting_id: i64,
        /// agenda, minutes or assignee-reminder
        #[arg(long = "type")]
        document_type: String,
    },
    /// List generated versions for a meeting.
    List {
        meeting_id: i64,
        #[arg(long = "type")]
        document_type: Option<String>,
    },
}
