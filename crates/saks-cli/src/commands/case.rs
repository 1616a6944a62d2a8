use chrono::Utc;
use saks_core::entities::NewCase;
use saks_core::enums::{CasePriority, CaseStatus};
use saks_db::repos::case::CaseFilter;
use saks_db::retry::with_retry;
use saks_db::updates::case::CaseUpdateBuilder;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CaseCommands;
use crate::commands::shared::parse::{clearable, parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks case`.
pub async fn handle(
    action: &CaseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CaseCommands::Create {
            title,
            description,
            theme,
            priority,
            assignee,
            start_date,
            deadline_date,
            deadline_text,
        } => {
            let input = NewCase {
                title: title.clone(),
                description: clearable(description.as_deref()).flatten(),
                theme: clearable(theme.as_deref()).flatten(),
                priority: parse_opt_enum::<CasePriority>(priority.as_deref(), "priority")?
                    .unwrap_or_default(),
                assignee_user_id: assignee.trim().to_string(),
                start_date: start_date.unwrap_or_else(|| Utc::now().date_naive()),
                status: CaseStatus::Open,
                closed_date: None,
                custom_deadline_date: *deadline_date,
                custom_deadline_text: clearable(deadline_text.as_deref()).flatten(),
            };
            let case = with_retry(&ctx.retry, || {
                ctx.service.create_case(&input, ctx.actor())
            })
            .await?;
            output(&case, flags.format)
        }
        CaseCommands::Update {
            id,
            title,
            description,
            theme,
            priority,
            assignee,
            start_date,
            status,
            closed_date,
            deadline_date,
            deadline_text,
        } => {
            let mut builder = CaseUpdateBuilder::new();
            if let Some(title) = title {
                builder = builder.title(title.trim());
            }
            if let Some(value) = clearable(description.as_deref()) {
                builder = builder.description(value);
            }
            if let Some(value) = clearable(theme.as_deref()) {
                builder = builder.theme(value);
            }
            if let Some(priority) = priority {
                builder = builder.priority(parse_enum(priority, "priority")?);
            }
            if let Some(assignee) = assignee {
                builder = builder.assignee_user_id(assignee.trim());
            }
            if let Some(start_date) = start_date {
                builder = builder.start_date(*start_date);
            }
            if let Some(status) = status {
                builder = builder.status(parse_enum::<CaseStatus>(status, "status")?);
            }
            if let Some(closed_date) = closed_date {
                builder = builder.closed_date(Some(*closed_date));
            }
            if let Some(deadline_date) = deadline_date {
                builder = builder.custom_deadline_date(Some(*deadline_date));
            }
            if let Some(value) = clearable(deadline_text.as_deref()) {
                builder = builder.custom_deadline_text(value);
            }
            let update = builder.build();
            let case = with_retry(&ctx.retry, || {
                ctx.service.update_case(*id, &update, ctx.actor())
            })
            .await?;
            output(&case, flags.format)
        }
        CaseCommands::Delete { id } => {
            let case = ctx.service.soft_delete_case(*id, ctx.actor()).await?;
            output(
                &json!({ "deleted": true, "case_number": case.case_number }),
                flags.format,
            )
        }
        CaseCommands::List {
            all,
            status,
            assignee,
        } => {
            let status = match status {
                Some(raw) => Some(parse_enum::<CaseStatus>(raw, "status")?),
                None if *all => None,
                None => Some(CaseStatus::Open),
            };
            let filter = CaseFilter {
                status,
                assignee_user_id: assignee.clone(),
            };
            let cases = ctx.service.list_cases(&filter).await?;
            output(&json!({ "cases": cases, "count": cases.len() }), flags.format)
        }
        CaseCommands::Get { id } => {
            let case = ctx.service.get_case(*id).await?;
            let comments = ctx.service.list_comments(*id).await?;
            output(&json!({ "case": case, "comments": comments }), flags.format)
        }
        CaseCommands::Timeline { id } => {
            let case = ctx.service.get_case(*id).await?;
            let items = ctx.service.case_timeline(*id).await?;
            output(
                &json!({ "case_number": case.case_number, "timeline": items }),
                flags.format,
            )
        }
    }
}
