use anyhow::anyhow;
use saks_core::entities::NewAttachment;
use saks_core::enums::MeetingCaseOutcome;
use saks_db::updates::minutes::{MinutesEntryUpdateBuilder, MinutesUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MinutesCommands;
use crate::commands::shared::parse::{clearable, parse_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `saks minutes`.
pub async fn handle(
    action: &MinutesCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MinutesCommands::Ensure { meeting_id } => {
            let view = ctx.service.ensure_minutes(*meeting_id, ctx.actor()).await?;
            output(&view, flags.format)
        }
        MinutesCommands::Show { meeting_id } => {
            let view = ctx
                .service
                .get_minutes(*meeting_id)
                .await?
                .ok_or_else(|| anyhow!("meeting {meeting_id} has no minutes yet"))?;
            output(&view, flags.format)
        }
        MinutesCommands::Update {
            meeting_id,
            attendance,
            absence,
            approval,
            next_meeting_date,
            clear_next_meeting_date,
            other_business,
        } => {
            let mut builder = MinutesUpdateBuilder::new();
            if let Some(value) = clearable(attendance.as_deref()) {
                builder = builder.attendance_text(value);
            }
            if let Some(value) = clearable(absence.as_deref()) {
                builder = builder.absence_text(value);
            }
            if let Some(value) = clearable(approval.as_deref()) {
                builder = builder.approval_of_previous_minutes_text(value);
            }
            if let Some(date) = next_meeting_date {
                builder = builder.next_meeting_date(Some(*date));
            } else if *clear_next_meeting_date {
                builder = builder.next_meeting_date(None);
            }
            if let Some(value) = clearable(other_business.as_deref()) {
                builder = builder.other_business_text(value);
            }
            let minutes = ctx
                .service
                .update_minutes(*meeting_id, &builder.build(), ctx.actor())
                .await?;
            output(&minutes, flags.format)
        }
        MinutesCommands::UpdateEntry {
            entry_id,
            notes,
            decision,
            follow_up,
            outcome,
        } => {
            let mut builder = MinutesEntryUpdateBuilder::new();
            if let Some(value) = clearable(notes.as_deref()) {
                builder = builder.official_notes(value);
            }
            if let Some(value) = clearable(decision.as_deref()) {
                builder = builder.decision_text(value);
            }
            if let Some(value) = clearable(follow_up.as_deref()) {
                builder = builder.follow_up_text(value);
            }
            if let Some(outcome) = outcome {
                builder = builder.outcome(parse_enum::<MeetingCaseOutcome>(outcome, "outcome")?);
            }
            let entry = ctx
                .service
                .update_minutes_entry(*entry_id, &builder.build(), ctx.actor())
                .await?;
            output(&entry, flags.format)
        }
        MinutesCommands::RecordSigned {
            meeting_id,
            file_name,
            content_type,
            size_bytes,
        } => {
            let input = NewAttachment::new(file_name.as_str(), content_type.as_str(), *size_bytes);
            let link = ctx
                .service
                .record_signed_minutes(*meeting_id, &input, ctx.actor())
                .await?;
            output(&link, flags.format)
        }
    }
}
