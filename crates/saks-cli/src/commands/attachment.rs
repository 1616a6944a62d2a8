use saks_core::entities::NewAttachment;
use saks_core::enums::AttachmentTarget;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AttachmentCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks attachment`.
pub async fn handle(
    action: &AttachmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AttachmentCommands::Add {
            target,
            target_id,
            file_name,
            content_type,
            size_bytes,
        } => {
            let target = parse_enum::<AttachmentTarget>(target, "target")?;
            let input = NewAttachment::new(file_name.as_str(), content_type.as_str(), *size_bytes);
            let link = ctx
                .service
                .attach_file(target, *target_id, &input, ctx.actor())
                .await?;
            output(&link, flags.format)
        }
        AttachmentCommands::Remove { target, link_id } => {
            let target = parse_enum::<AttachmentTarget>(target, "target")?;
            let link = ctx
                .service
                .unlink_attachment(target, *link_id, ctx.actor())
                .await?;
            output(
                &json!({ "removed": true, "id": link.id, "attachment_id": link.attachment.id }),
                flags.format,
            )
        }
        AttachmentCommands::List { target, target_id } => {
            let target = parse_enum::<AttachmentTarget>(target, "target")?;
            let links = ctx.service.list_attachments(target, *target_id).await?;
            output(
                &json!({ "attachments": links, "count": links.len() }),
                flags.format,
            )
        }
    }
}
