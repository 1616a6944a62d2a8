use clap::Subcommand;

/// Case comment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CommentCommands {
    /// Add a comment to a case.
    Add { case_id: i64, text: String },
    /// Replace a comment's text.
    Edit { id: i64, text: String },
    /// Soft-delete a comment.
    Delete { id: i64 },
    /// List comments of a case.
    List { case_id: i64 },
}
