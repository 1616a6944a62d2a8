use saks_core::enums::PdfDocumentType;
use saks_db::retry::with_retry;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PdfCommands;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks pdf`.
pub async fn handle(
    action: &PdfCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PdfCommands::Allocate {
            meeting_id,
            document_type,
        } => {
            let document_type = parse_enum::<PdfDocumentType>(document_type, "type")?;
            let generation = with_retry(&ctx.retry, || {
                ctx.service
                    .allocate_pdf_sequence(*meeting_id, document_type, ctx.actor())
            })
            .await?;
            let meeting = ctx.service.get_meeting(*meeting_id).await?;
            output(
                &json!({
                    "generation": generation,
                    "file_name": generation.file_name(&meeting),
                }),
                flags.format,
            )
        }
        PdfCommands::List {
            meeting_id,
            document_type,
        } => {
            let meeting = ctx.service.get_meeting(*meeting_id).await?;
            let document_type =
                parse_opt_enum::<PdfDocumentType>(document_type.as_deref(), "type")?;
            let generations = ctx
                .service
                .list_pdf_generations(*meeting_id, document_type)
                .await?;
            let files: Vec<_> = generations
                .iter()
                .map(|g| json!({ "generation": g, "file_name": g.file_name(&meeting) }))
                .collect();
            output(&json!({ "generations": files }), flags.format)
        }
    }
}
