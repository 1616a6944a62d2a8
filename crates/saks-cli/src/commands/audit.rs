use saks_core::enums::{AuditAction, EntityType};
use saks_db::repos::audit::AuditFilter;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks audit`.
pub async fn handle(
    action: &AuditCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuditCommands::List {
            entity_type,
            entity_id,
            action,
            actor,
            q,
            take,
        } => {
            let filter = AuditFilter {
                entity_type: parse_opt_enum::<EntityType>(entity_type.as_deref(), "entity-type")?,
                entity_id: entity_id.clone(),
                action: parse_opt_enum::<AuditAction>(action.as_deref(), "action")?,
                actor_id: actor.clone(),
                q: q.clone(),
                take: *take,
            };
            let records = ctx.service.query_audit(&filter).await?;
            output(
                &json!({ "records": records, "count": records.len() }),
                flags.format,
            )
        }
        AuditCommands::Entity {
            entity_type,
            entity_id,
        } => {
            let entity_type = parse_enum::<EntityType>(entity_type, "entity-type")?;
            let records = ctx.service.audit_for_entity(entity_type, entity_id).await?;
            output(&json!({ "records": records }), flags.format)
        }
        AuditCommands::Get { id } => {
            let record = ctx.service.get_audit(*id).await?;
            output(&record, flags.format)
        }
    }
}
