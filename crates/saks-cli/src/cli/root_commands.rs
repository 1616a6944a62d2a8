use clap::Subcommand;

use crate::cli::subcommands::{
    AttachmentCommands, AuditCommands, CaseCommands, CommentCommands, MeetingCommands,
    MinutesCommands, PdfCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Board cases.
    Case {
        #[command(subcommand)]
        action: CaseCommands,
    },
    /// Case comments.
    Comment {
        #[command(subcommand)]
        action: CommentCommands,
    },
    /// Meetings and agendas.
    Meeting {
        #[command(subcommand)]
        action: MeetingCommands,
    },
    /// Meeting minutes.
    Minutes {
        #[command(subcommand)]
        action: MinutesCommands,
    },
    /// Files linked to comments, agenda items, minutes entries and meetings.
    Attachment {
        #[command(subcommand)]
        action: AttachmentCommands,
    },
    /// PDF version numbers.
    Pdf {
        #[command(subcommand)]
        action: PdfCommands,
    },
    /// Audit history.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
}
