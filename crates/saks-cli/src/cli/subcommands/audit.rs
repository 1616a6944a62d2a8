use clap::Subcommand;

/// Audit history commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// List audit records, newest first.
    List {
        #[arg(long)]
        entity_type: Option<String>,
        #[arg(long)]
        entity_id: Option<String>,
        #[arg(long)]
        action: Option<String>,
        #[arg(long = "by")]
        actor: Option<String>,
        /// Substring of entity type, entity id or reason
        #[arg(long)]
        q: Option<String>,
        /// Page size, clamped to the configured bounds
        #[arg(long)]
        take: Option<u32>,
    },
    /// Full history of one entity, oldest first.
    Entity {
        entity_type: String,
        entity_id: String,
    },
    /// Get one audit record by ID.
    Get { id: i64 },
}
