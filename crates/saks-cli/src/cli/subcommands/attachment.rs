use clap::Subcommand;

/// Attachment commands. TARGET is comment, agenda-item, minutes-entry or
/// signed-minutes; its ID is the comment, agenda item, minutes entry or
/// meeting ID.
#[derive(Clone, Debug, Subcommand)]
pub enum AttachmentCommands {
    /// Register an uploaded file and link it.
    Add {
        target: String,
        target_id: i64,
        #[arg(long)]
        file_name: String,
        /// application/pdf or image/*
        #[arg(long)]
        content_type: String,
        #[arg(long)]
        size_bytes: i64,
    },
    /// Unlink a file. The metadata stays.
    Remove { target: String, link_id: i64 },
    /// List linked files.
    List { target: String, target_id: i64 },
}
