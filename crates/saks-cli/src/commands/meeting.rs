use saks_core::entities::NewMeeting;
use saks_db::updates::agenda::AgendaItemUpdateBuilder;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{MeetingCommands, MoveDirection};
use crate::commands::shared::parse::clearable;
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks meeting`.
pub async fn handle(
    action: &MeetingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MeetingCommands::Create {
            date,
            sequence,
            year,
            location,
        } => {
            let input = NewMeeting {
                meeting_date: *date,
                year: *year,
                year_sequence_number: *sequence,
                location: clearable(location.as_deref()).flatten(),
            };
            let meeting = ctx.service.create_meeting(&input, ctx.actor()).await?;
            output(
                &json!({ "meeting": meeting, "label": meeting.label() }),
                flags.format,
            )
        }
        MeetingCommands::List => {
            let meetings = ctx.service.list_meetings().await?;
            output(
                &json!({ "meetings": meetings, "count": meetings.len() }),
                flags.format,
            )
        }
        MeetingCommands::Get { id } => {
            let meeting = ctx.service.get_meeting(*id).await?;
            let agenda = ctx.service.list_agenda(*id).await?;
            output(
                &json!({ "meeting": meeting, "label": meeting.label(), "agenda": agenda }),
                flags.format,
            )
        }
        MeetingCommands::Agenda { meeting_id } => {
            let agenda = ctx.service.list_agenda(*meeting_id).await?;
            output(&json!({ "agenda": agenda }), flags.format)
        }
        MeetingCommands::AddCase {
            meeting_id,
            case_id,
        } => {
            let item = ctx
                .service
                .add_case_to_agenda(*meeting_id, *case_id, ctx.actor())
                .await?;
            output(&item, flags.format)
        }
        MeetingCommands::Move { item_id, direction } => {
            let up = *direction == MoveDirection::Up;
            let agenda = ctx
                .service
                .move_agenda_item(*item_id, up, ctx.actor())
                .await?;
            output(&json!({ "agenda": agenda }), flags.format)
        }
        MeetingCommands::EditItem {
            item_id,
            text,
            deadline_date,
            clear_deadline_date,
            deadline_text,
            follow_up,
        } => {
            let mut builder = AgendaItemUpdateBuilder::new();
            if let Some(text) = text {
                builder = builder.agenda_text_snapshot(text.as_str());
            }
            if let Some(date) = deadline_date {
                builder = builder.deadline_override_date(Some(*date));
            } else if *clear_deadline_date {
                builder = builder.deadline_override_date(None);
            }
            if let Some(value) = clearable(deadline_text.as_deref()) {
                builder = builder.deadline_override_text(value);
            }
            if let Some(value) = clearable(follow_up.as_deref()) {
                builder = builder.follow_up_text_draft(value);
            }
            let item = ctx
                .service
                .update_agenda_item(*item_id, &builder.build(), ctx.actor())
                .await?;
            output(&item, flags.format)
        }
        MeetingCommands::RemoveItem { item_id } => {
            let item = ctx.service.remove_agenda_item(*item_id, ctx.actor()).await?;
            output(
                &json!({ "removed": true, "id": item.id, "case_id": item.case_id }),
                flags.format,
            )
        }
        MeetingCommands::Delete { id } => {
            let meeting = ctx.service.soft_delete_meeting(*id, ctx.actor()).await?;
            output(
                &json!({ "deleted": true, "label": meeting.label() }),
                flags.format,
            )
        }
    }
}
