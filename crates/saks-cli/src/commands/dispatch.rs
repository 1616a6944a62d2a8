use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Case { action } => commands::case::handle(&action, ctx, flags).await,
        Commands::Comment { action } => commands::comment::handle(&action, ctx, flags).await,
        Commands::Meeting { action } => commands::meeting::handle(&action, ctx, flags).await,
        Commands::Minutes { action } => commands::minutes::handle(&action, ctx, flags).await,
        Commands::Attachment { action } => {
            commands::attachment::handle(&action, ctx, flags).await
        }
        Commands::Pdf { action } => commands::pdf::handle(&action, ctx, flags).await,
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags).await,
    }
}
