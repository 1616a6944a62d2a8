use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CommentCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks comment`.
pub async fn handle(
    action: &CommentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CommentCommands::Add { case_id, text } => {
            let comment = ctx.service.add_comment(*case_id, text, ctx.actor()).await?;
            output(&comment, flags.format)
        }
        CommentCommands::Edit { id, text } => {
            let comment = ctx.service.edit_comment(*id, text, ctx.actor()).await?;
            output(&comment, flags.format)
        }
        CommentCommands::Delete { id } => {
            let comment = ctx.service.soft_delete_comment(*id, ctx.actor()).await?;
            output(&json!({ "deleted": true, "id": comment.id }), flags.format)
        }
        CommentCommands::List { case_id } => {
            let comments = ctx.service.list_comments(*case_id).await?;
            output(
                &json!({ "comments": comments, "count": comments.len() }),
                flags.format,
            )
        }
    }
}
