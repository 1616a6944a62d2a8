//! Meeting minutes repository.
//!
//! A meeting has at most one minutes record and one entry per agenda item.
//! `ensure_minutes` is safe to call repeatedly: it only fills in what is missing.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use saks_core::entities::{MeetingMinutes, MinutesEntry};
use saks_core::enums::{AuditAction, EntityType, MeetingCaseOutcome};

use crate::error::DatabaseError;
use crate::helpers::{
    format_optional_date, get_opt_string, normalize_text, parse_datetime, parse_enum, parse_optional_date,
};
use crate::repos::audit::{AuditTrail, NewAuditRecord};
use crate::repos::case::fetch_case;
use crate::repos::meeting::live_meeting;
use crate::service::SaksService;
use crate::updates::minutes::{MinutesEntryUpdate, MinutesUpdate};

const MINUTES_COLUMNS: &str = "id, meeting_id, attendance_text, absence_text, \
     approval_of_previous_minutes_text, next_meeting_date, other_business_text, created_at";

pub(crate) const ENTRY_COLUMNS: &str = "me.id, me.meeting_id, me.meeting_case_id, me.case_id, \
     me.official_notes, me.decision_text, me.follow_up_text, me.outcome";

/// Minutes record of a meeting together with its entries in agenda order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinutesView {
    pub minutes: MeetingMinutes,
    pub entries: Vec<MinutesEntry>,
}

fn row_to_minutes(row: &libsql::Row) -> Result<MeetingMinutes, DatabaseError> {
    Ok(MeetingMinutes {
        id: row.get::<i64>(0)?,
        meeting_id: row.get::<i64>(1)?,
        attendance_text: get_opt_string(row, 2)?,
        absence_text: get_opt_string(row, 3)?,
        approval_of_previous_minutes_text: get_opt_string(row, 4)?,
        next_meeting_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        other_business_text: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

pub(crate) fn row_to_entry(row: &libsql::Row) -> Result<MinutesEntry, DatabaseError> {
    Ok(MinutesEntry {
        id: row.get::<i64>(0)?,
        meeting_id: row.get::<i64>(1)?,
        meeting_case_id: row.get::<i64>(2)?,
        case_id: row.get::<i64>(3)?,
        official_notes: get_opt_string(row, 4)?,
        decision_text: get_opt_string(row, 5)?,
        follow_up_text: get_opt_string(row, 6)?,
        outcome: parse_enum(&row.get::<String>(7)?)?,
    })
}

async fn fetch_minutes(
    conn: &libsql::Connection,
    meeting_id: i64,
) -> Result<Option<MeetingMinutes>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {MINUTES_COLUMNS} FROM meeting_minutes WHERE meeting_id = ?1"),
            [meeting_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_minutes(&row)?)),
        None => Ok(None),
    }
}

/// Entries belonging to live agenda items, in agenda order.
async fn entries_for_meeting(
    conn: &libsql::Connection,
    meeting_id: i64,
) -> Result<Vec<MinutesEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM minutes_entries me
                 JOIN meeting_cases mc ON mc.id = me.meeting_case_id
                 WHERE me.meeting_id = ?1 AND mc.is_deleted = 0
                 ORDER BY mc.agenda_order ASC, me.id ASC"
            ),
            [meeting_id],
        )
        .await?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_entry(&row)?);
    }
    Ok(entries)
}

pub(crate) async fn fetch_entry(conn: &libsql::Connection, id: i64) -> Result<MinutesEntry, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {ENTRY_COLUMNS} FROM minutes_entries me WHERE me.id = ?1"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "minutes_entry",
        id: id.to_string(),
    })?;
    row_to_entry(&row)
}

async fn fill_minutes(
    conn: &libsql::Connection,
    meeting_id: i64,
    actor: Option<&str>,
) -> Result<MinutesView, DatabaseError> {
    live_meeting(conn, meeting_id).await?;

    let minutes = if let Some(existing) = fetch_minutes(conn, meeting_id).await? {
        existing
    } else {
        let now = Utc::now();
        conn.execute(
            "INSERT INTO meeting_minutes (meeting_id, created_at) VALUES (?1, ?2)",
            libsql::params![meeting_id, now.to_rfc3339()],
        )
        .await?;
        let minutes = MeetingMinutes {
            id: conn.last_insert_rowid(),
            meeting_id,
            attendance_text: None,
            absence_text: None,
            approval_of_previous_minutes_text: None,
            next_meeting_date: None,
            other_business_text: None,
            created_at: now,
        };
        AuditTrail::record(
            conn,
            &NewAuditRecord::new(
                AuditAction::Create,
                EntityType::MeetingMinutes,
                minutes.id.to_string(),
            )
            .after(json!({ "meeting_id": meeting_id }))
            .actor(actor),
        )
        .await?;
        minutes
    };

    let mut rows = conn
        .query(
            "SELECT mc.id, mc.case_id FROM meeting_cases mc
             WHERE mc.meeting_id = ?1 AND mc.is_deleted = 0
               AND NOT EXISTS (SELECT 1 FROM minutes_entries me WHERE me.meeting_case_id = mc.id)
             ORDER BY mc.agenda_order ASC, mc.id ASC",
            [meeting_id],
        )
        .await?;
    let mut missing = Vec::new();
    while let Some(row) = rows.next().await? {
        missing.push((row.get::<i64>(0)?, row.get::<i64>(1)?));
    }

    for (meeting_case_id, case_id) in &missing {
        conn.execute(
            "INSERT INTO minutes_entries (meeting_id, meeting_case_id, case_id, outcome)
             VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                meeting_id,
                *meeting_case_id,
                *case_id,
                MeetingCaseOutcome::Continue.as_str()
            ],
        )
        .await?;
    }

    if !missing.is_empty() {
        let added: Vec<i64> = missing.iter().map(|(mc, _)| *mc).collect();
        AuditTrail::record(
            conn,
            &NewAuditRecord::new(AuditAction::Update, EntityType::Meeting, meeting_id.to_string())
                .after(json!({ "minutes_entries_added_for": added }))
                .reason("Ensured minutes entries for agenda")
                .actor(actor),
        )
        .await?;
    }

    let entries = entries_for_meeting(conn, meeting_id).await?;
    Ok(MinutesView { minutes, entries })
}

fn entry_snapshot(entry: &MinutesEntry) -> serde_json::Value {
    json!({
        "official_notes": entry.official_notes,
        "decision_text": entry.decision_text,
        "follow_up_text": entry.follow_up_text,
        "outcome": entry.outcome,
    })
}

async fn apply_entry_update(
    conn: &libsql::Connection,
    id: i64,
    update: &MinutesEntryUpdate,
    actor: Option<&str>,
) -> Result<MinutesEntry, DatabaseError> {
    let current = fetch_entry(conn, id).await?;
    live_meeting(conn, current.meeting_id).await?;

    let mut next = current.clone();
    if let Some(ref notes) = update.official_notes {
        next.official_notes = normalize_text(notes.as_deref());
    }
    if let Some(ref decision) = update.decision_text {
        next.decision_text = normalize_text(decision.as_deref());
    }
    if let Some(ref follow_up) = update.follow_up_text {
        next.follow_up_text = normalize_text(follow_up.as_deref());
    }
    if let Some(outcome) = update.outcome {
        next.outcome = outcome;
    }

    if next == current {
        return Ok(current);
    }

    conn.execute(
        "UPDATE minutes_entries SET official_notes = ?1, decision_text = ?2, follow_up_text = ?3, outcome = ?4
         WHERE id = ?5",
        libsql::params![
            next.official_notes.as_deref(),
            next.decision_text.as_deref(),
            next.follow_up_text.as_deref(),
            next.outcome.as_str(),
            id
        ],
    )
    .await?;

    let reason = match fetch_case(conn, current.case_id).await? {
        Some(case) => format!("Updated minutes entry for case #{}", case.case_number),
        None => "Updated minutes entry".to_string(),
    };
    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Update, EntityType::MinutesEntry, id.to_string())
            .before(entry_snapshot(&current))
            .after(entry_snapshot(&next))
            .reason(reason)
            .actor(actor),
    )
    .await?;

    Ok(next)
}

fn minutes_snapshot(minutes: &MeetingMinutes) -> serde_json::Value {
    json!({
        "attendance_text": minutes.attendance_text,
        "absence_text": minutes.absence_text,
        "approval_of_previous_minutes_text": minutes.approval_of_previous_minutes_text,
        "next_meeting_date": format_optional_date(minutes.next_meeting_date),
        "other_business_text": minutes.other_business_text,
    })
}

async fn apply_minutes_update(
    conn: &libsql::Connection,
    meeting_id: i64,
    update: &MinutesUpdate,
    actor: Option<&str>,
) -> Result<MeetingMinutes, DatabaseError> {
    live_meeting(conn, meeting_id).await?;
    let current = fetch_minutes(conn, meeting_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "meeting_minutes",
            id: meeting_id.to_string(),
        })?;

    let mut next = current.clone();
    if let Some(ref text) = update.attendance_text {
        next.attendance_text = normalize_text(text.as_deref());
    }
    if let Some(ref text) = update.absence_text {
        next.absence_text = normalize_text(text.as_deref());
    }
    if let Some(ref text) = update.approval_of_previous_minutes_text {
        next.approval_of_previous_minutes_text = normalize_text(text.as_deref());
    }
    if let Some(date) = update.next_meeting_date {
        next.next_meeting_date = date;
    }
    if let Some(ref text) = update.other_business_text {
        next.other_business_text = normalize_text(text.as_deref());
    }

    if next == current {
        return Ok(current);
    }

    conn.execute(
        "UPDATE meeting_minutes SET attendance_text = ?1, absence_text = ?2,
             approval_of_previous_minutes_text = ?3, next_meeting_date = ?4, other_business_text = ?5
         WHERE id = ?6",
        libsql::params![
            next.attendance_text.as_deref(),
            next.absence_text.as_deref(),
            next.approval_of_previous_minutes_text.as_deref(),
            format_optional_date(next.next_meeting_date),
            next.other_business_text.as_deref(),
            current.id
        ],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(
            AuditAction::Update,
            EntityType::MeetingMinutes,
            current.id.to_string(),
        )
        .before(minutes_snapshot(&current))
        .after(minutes_snapshot(&next))
        .reason("Updated minutes")
        .actor(actor),
    )
    .await?;

    Ok(next)
}

impl SaksService {
    /// Make sure the meeting has a minutes record and an entry for every live
    /// agenda item. New entries start with outcome `Continue`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or deleted meeting.
    pub async fn ensure_minutes(
        &self,
        meeting_id: i64,
        actor: Option<&str>,
    ) -> Result<MinutesView, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = fill_minutes(&tx, meeting_id, actor).await;
        crate::finish(tx, result).await
    }

    /// Current minutes of a meeting, if any were created.
    pub async fn get_minutes(&self, meeting_id: i64) -> Result<Option<MinutesView>, DatabaseError> {
        let conn = self.db().conn();
        let Some(minutes) = fetch_minutes(conn, meeting_id).await? else {
            return Ok(None);
        };
        let entries = entries_for_meeting(conn, meeting_id).await?;
        Ok(Some(MinutesView { minutes, entries }))
    }

    /// Edit an entry's notes, decision, follow-up or outcome.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry or its meeting is gone.
    pub async fn update_minutes_entry(
        &self,
        entry_id: i64,
        update: &MinutesEntryUpdate,
        actor: Option<&str>,
    ) -> Result<MinutesEntry, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_entry_update(&tx, entry_id, update, actor).await;
        crate::finish(tx, result).await
    }

    /// Edit the minutes header: attendance, absence, approval of the previous
    /// minutes, next meeting date and other business.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the meeting is gone or has no minutes yet.
    pub async fn update_minutes(
        &self,
        meeting_id: i64,
        update: &MinutesUpdate,
        actor: Option<&str>,
    ) -> Result<MeetingMinutes, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_minutes_update(&tx, meeting_id, update, actor).await;
        crate::finish(tx, result).await
    }
}
