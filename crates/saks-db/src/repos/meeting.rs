//! Meeting and agenda repository.
//!
//! Agenda items (`meeting_cases`) snapshot the case text at the time they are
//! added and carry an explicit `agenda_order` that reordering swaps between
//! neighbours.

use chrono::Utc;
use serde_json::json;

use saks_core::entities::{Meeting, MeetingCase, NewMeeting};
use saks_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{
    format_optional_date, get_flag, get_i32, get_opt_string, normalize_text, parse_date, parse_datetime,
    parse_optional_date, parse_optional_datetime,
};
use crate::repos::audit::{AuditTrail, NewAuditRecord};
use crate::repos::case::live_case;
use crate::service::SaksService;
use crate::updates::agenda::AgendaItemUpdate;

pub(crate) const MEETING_COLUMNS: &str =
    "m.id, m.meeting_date, m.year, m.year_sequence_number, m.location, m.created_at, m.is_deleted, m.deleted_at, m.deleted_by";

const AGENDA_COLUMNS: &str = "id, meeting_id, case_id, agenda_order, agenda_text_snapshot, \
     deadline_override_date, deadline_override_text, follow_up_text_draft, is_deleted, deleted_at, deleted_by";

/// Read a meeting whose columns start at `base` (joins put other tables first).
pub(crate) fn row_to_meeting_at(row: &libsql::Row, base: i32) -> Result<Meeting, DatabaseError> {
    Ok(Meeting {
        id: row.get::<i64>(base)?,
        meeting_date: parse_date(&row.get::<String>(base + 1)?)?,
        year: get_i32(row, base + 2)?,
        year_sequence_number: get_i32(row, base + 3)?,
        location: get_opt_string(row, base + 4)?,
        created_at: parse_datetime(&row.get::<String>(base + 5)?)?,
        is_deleted: get_flag(row, base + 6)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, base + 7)?.as_deref())?,
        deleted_by: get_opt_string(row, base + 8)?,
    })
}

fn row_to_agenda_item(row: &libsql::Row) -> Result<MeetingCase, DatabaseError> {
    Ok(MeetingCase {
        id: row.get::<i64>(0)?,
        meeting_id: row.get::<i64>(1)?,
        case_id: row.get::<i64>(2)?,
        agenda_order: row.get::<i64>(3)?,
        agenda_text_snapshot: row.get::<String>(4)?,
        deadline_override_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        deadline_override_text: get_opt_string(row, 6)?,
        follow_up_text_draft: get_opt_string(row, 7)?,
        is_deleted: get_flag(row, 8)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        deleted_by: get_opt_string(row, 10)?,
    })
}

/// Any meeting by id, deleted or not.
pub(crate) async fn fetch_meeting(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<Meeting>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {MEETING_COLUMNS} FROM meetings m WHERE m.id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_meeting_at(&row, 0)?)),
        None => Ok(None),
    }
}

pub(crate) async fn live_meeting(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Meeting, DatabaseError> {
    fetch_meeting(conn, id)
        .await?
        .filter(|m| !m.is_deleted)
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "meeting",
            id: id.to_string(),
        })
}

pub(crate) async fn live_agenda_item(
    conn: &libsql::Connection,
    id: i64,
) -> Result<MeetingCase, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {AGENDA_COLUMNS} FROM meeting_cases WHERE id = ?1 AND is_deleted = 0"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "meeting_case",
        id: id.to_string(),
    })?;
    row_to_agenda_item(&row)
}

/// Live agenda items of a meeting in agenda order.
pub(crate) async fn agenda_for_meeting(
    conn: &libsql::Connection,
    meeting_id: i64,
) -> Result<Vec<MeetingCase>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {AGENDA_COLUMNS} FROM meeting_cases
                 WHERE meeting_id = ?1 AND is_deleted = 0
                 ORDER BY agenda_order ASC, id ASC"
            ),
            [meeting_id],
        )
        .await?;
    let mut items = Vec::new();
    while let Some(row) = rows.next().await? {
        items.push(row_to_agenda_item(&row)?);
    }
    Ok(items)
}

async fn insert_meeting(
    conn: &libsql::Connection,
    input: &NewMeeting,
    actor: Option<&str>,
) -> Result<Meeting, DatabaseError> {
    if input.year_sequence_number < 1 {
        return Err(DatabaseError::InvalidState(
            "meeting year sequence number must be at least 1".into(),
        ));
    }

    let now = Utc::now();
    let meeting = Meeting {
        id: 0,
        meeting_date: input.meeting_date,
        year: input.effective_year(),
        year_sequence_number: input.year_sequence_number,
        location: normalize_text(input.location.as_deref()),
        created_at: now,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    };

    conn.execute(
        "INSERT INTO meetings (meeting_date, year, year_sequence_number, location, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            meeting.meeting_date.format("%Y-%m-%d").to_string(),
            i64::from(meeting.year),
            i64::from(meeting.year_sequence_number),
            meeting.location.as_deref(),
            now.to_rfc3339()
        ],
    )
    .await?;
    let meeting = Meeting {
        id: conn.last_insert_rowid(),
        ..meeting
    };

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Create, EntityType::Meeting, meeting.id.to_string())
            .after(json!({
                "meeting_date": meeting.meeting_date,
                "year": meeting.year,
                "year_sequence_number": meeting.year_sequence_number,
                "location": meeting.location,
            }))
            .actor(actor),
    )
    .await?;

    Ok(meeting)
}

async fn mark_meeting_deleted(
    conn: &libsql::Connection,
    id: i64,
    actor: Option<&str>,
) -> Result<Meeting, DatabaseError> {
    let current = live_meeting(conn, id).await?;
    let now = Utc::now();
    let deleted_by = normalize_text(actor);

    conn.execute(
        "UPDATE meetings SET is_deleted = 1, deleted_at = ?1, deleted_by = ?2 WHERE id = ?3",
        libsql::params![now.to_rfc3339(), deleted_by.as_deref(), id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::SoftDelete, EntityType::Meeting, id.to_string())
            .before(json!({ "is_deleted": false, "label": current.label() }))
            .after(json!({ "is_deleted": true, "deleted_at": now, "deleted_by": deleted_by }))
            .actor(actor),
    )
    .await?;

    Ok(Meeting {
        is_deleted: true,
        deleted_at: Some(now),
        deleted_by,
        ..current
    })
}

async fn insert_agenda_item(
    conn: &libsql::Connection,
    meeting_id: i64,
    case_id: i64,
    actor: Option<&str>,
) -> Result<MeetingCase, DatabaseError> {
    live_meeting(conn, meeting_id).await?;
    let case = live_case(conn, case_id).await?;

    let mut rows = conn
        .query(
            &format!(
                "SELECT {AGENDA_COLUMNS} FROM meeting_cases
                 WHERE meeting_id = ?1 AND case_id = ?2 AND is_deleted = 0"
            ),
            [meeting_id, case_id],
        )
        .await?;
    if let Some(row) = rows.next().await? {
        return row_to_agenda_item(&row);
    }

    let mut rows = conn
        .query(
            "SELECT COALESCE(MAX(agenda_order), 0) + 1 FROM meeting_cases
             WHERE meeting_id = ?1 AND is_deleted = 0",
            [meeting_id],
        )
        .await?;
    let agenda_order = rows
        .next()
        .await?
        .ok_or(DatabaseError::NoResult)?
        .get::<i64>(0)?;

    let agenda_text_snapshot = normalize_text(case.description.as_deref()).unwrap_or(case.title);

    conn.execute(
        "INSERT INTO meeting_cases (meeting_id, case_id, agenda_order, agenda_text_snapshot)
         VALUES (?1, ?2, ?3, ?4)",
        libsql::params![meeting_id, case_id, agenda_order, agenda_text_snapshot.as_str()],
    )
    .await?;

    let item = MeetingCase {
        id: conn.last_insert_rowid(),
        meeting_id,
        case_id,
        agenda_order,
        agenda_text_snapshot,
        deadline_override_date: None,
        deadline_override_text: None,
        follow_up_text_draft: None,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    };

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Create, EntityType::MeetingCase, item.id.to_string())
            .after(json!({
                "meeting_id": meeting_id,
                "case_id": case_id,
                "agenda_order": agenda_order,
                "agenda_text_snapshot": item.agenda_text_snapshot,
            }))
            .reason("Added case to meeting agenda")
            .actor(actor),
    )
    .await?;

    Ok(item)
}

async fn swap_with_neighbour(
    conn: &libsql::Connection,
    id: i64,
    up: bool,
    actor: Option<&str>,
) -> Result<Vec<MeetingCase>, DatabaseError> {
    let item = live_agenda_item(conn, id).await?;

    let (comparison, direction) = if up { ("<", "DESC") } else { (">", "ASC") };
    let mut rows = conn
        .query(
            &format!(
                "SELECT {AGENDA_COLUMNS} FROM meeting_cases
                 WHERE meeting_id = ?1 AND is_deleted = 0 AND agenda_order {comparison} ?2
                 ORDER BY agenda_order {direction}, id {direction} LIMIT 1"
            ),
            [item.meeting_id, item.agenda_order],
        )
        .await?;
    let Some(row) = rows.next().await? else {
        return agenda_for_meeting(conn, item.meeting_id).await;
    };
    let neighbour = row_to_agenda_item(&row)?;

    conn.execute(
        "UPDATE meeting_cases SET agenda_order = ?1 WHERE id = ?2",
        [neighbour.agenda_order, item.id],
    )
    .await?;
    conn.execute(
        "UPDATE meeting_cases SET agenda_order = ?1 WHERE id = ?2",
        [item.agenda_order, neighbour.id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(
            AuditAction::Update,
            EntityType::MeetingCase,
            format!("{},{}", item.id, neighbour.id),
        )
        .before(json!({
            "a": { "id": item.id, "agenda_order": item.agenda_order },
            "b": { "id": neighbour.id, "agenda_order": neighbour.agenda_order },
        }))
        .after(json!({
            "a": { "id": item.id, "agenda_order": neighbour.agenda_order },
            "b": { "id": neighbour.id, "agenda_order": item.agenda_order },
        }))
        .reason("Reordered agenda items")
        .actor(actor),
    )
    .await?;

    agenda_for_meeting(conn, item.meeting_id).await
}

async fn mark_agenda_item_deleted(
    conn: &libsql::Connection,
    id: i64,
    actor: Option<&str>,
) -> Result<MeetingCase, DatabaseError> {
    let current = live_agenda_item(conn, id).await?;
    let now = Utc::now();
    let deleted_by = normalize_text(actor);

    conn.execute(
        "UPDATE meeting_cases SET is_deleted = 1, deleted_at = ?1, deleted_by = ?2 WHERE id = ?3",
        libsql::params![now.to_rfc3339(), deleted_by.as_deref(), id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::SoftDelete, EntityType::MeetingCase, id.to_string())
            .before(json!({
                "is_deleted": false,
                "meeting_id": current.meeting_id,
                "case_id": current.case_id,
                "agenda_order": current.agenda_order,
            }))
            .after(json!({ "is_deleted": true, "deleted_at": now, "deleted_by": deleted_by }))
            .reason("Removed case from meeting agenda")
            .actor(actor),
    )
    .await?;

    Ok(MeetingCase {
        is_deleted: true,
        deleted_at: Some(now),
        deleted_by,
        ..current
    })
}

fn agenda_item_snapshot(item: &MeetingCase) -> serde_json::Value {
    json!({
        "agenda_text_snapshot": item.agenda_text_snapshot,
        "deadline_override_date": format_optional_date(item.deadline_override_date),
        "deadline_override_text": item.deadline_override_text,
        "follow_up_text_draft": item.follow_up_text_draft,
    })
}

async fn apply_agenda_item_update(
    conn: &libsql::Connection,
    id: i64,
    update: &AgendaItemUpdate,
    actor: Option<&str>,
) -> Result<MeetingCase, DatabaseError> {
    let current = live_agenda_item(conn, id).await?;
    let mut next = current.clone();

    if let Some(text) = &update.agenda_text_snapshot {
        next.agenda_text_snapshot = normalize_text(Some(text.as_str())).ok_or_else(|| {
            DatabaseError::InvalidState("agenda text must not be blank".into())
        })?;
    }
    if let Some(date) = update.deadline_override_date {
        next.deadline_override_date = date;
    }
    if let Some(text) = &update.deadline_override_text {
        next.deadline_override_text = normalize_text(text.as_deref());
    }
    if let Some(text) = &update.follow_up_text_draft {
        next.follow_up_text_draft = normalize_text(text.as_deref());
    }

    if next == current {
        return Ok(current);
    }

    conn.execute(
        "UPDATE meeting_cases SET agenda_text_snapshot = ?1, deadline_override_date = ?2,
             deadline_override_text = ?3, follow_up_text_draft = ?4
         WHERE id = ?5",
        libsql::params![
            next.agenda_text_snapshot.as_str(),
            format_optional_date(next.deadline_override_date),
            next.deadline_override_text.as_deref(),
            next.follow_up_text_draft.as_deref(),
            id
        ],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Update, EntityType::MeetingCase, id.to_string())
            .before(agenda_item_snapshot(&current))
            .after(agenda_item_snapshot(&next))
            .reason("Edited agenda item")
            .actor(actor),
    )
    .await?;

    Ok(next)
}

impl SaksService {
    /// Create a meeting. The year defaults to the meeting date's year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the year sequence number is below 1.
    pub async fn create_meeting(
        &self,
        input: &NewMeeting,
        actor: Option<&str>,
    ) -> Result<Meeting, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = insert_meeting(&tx, input, actor).await;
        crate::finish(tx, result).await
    }

    /// Soft-delete a meeting. Its PDF scopes become invalid for allocation.
    pub async fn soft_delete_meeting(
        &self,
        id: i64,
        actor: Option<&str>,
    ) -> Result<Meeting, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = mark_meeting_deleted(&tx, id, actor).await;
        crate::finish(tx, result).await
    }

    pub async fn get_meeting(&self, id: i64) -> Result<Meeting, DatabaseError> {
        live_meeting(self.db().conn(), id).await
    }

    /// Live meetings, latest date first.
    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {MEETING_COLUMNS} FROM meetings m
                     WHERE m.is_deleted = 0
                     ORDER BY m.meeting_date DESC, m.id DESC"
                ),
                (),
            )
            .await?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next().await? {
            meetings.push(row_to_meeting_at(&row, 0)?);
        }
        Ok(meetings)
    }

    /// Put a case on a meeting's agenda, last in order.
    ///
    /// Adding a case that is already on the agenda returns the existing item
    /// and records nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown or deleted meeting or case.
    pub async fn add_case_to_agenda(
        &self,
        meeting_id: i64,
        case_id: i64,
        actor: Option<&str>,
    ) -> Result<MeetingCase, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = insert_agenda_item(&tx, meeting_id, case_id, actor).await;
        crate::finish(tx, result).await
    }

    /// Swap an agenda item with its neighbour above (`up`) or below.
    ///
    /// Both rows change in one transaction under one audit record whose entity
    /// id is `"moved,neighbour"`. At either end of the agenda nothing changes.
    /// Returns the agenda after the move.
    pub async fn move_agenda_item(
        &self,
        id: i64,
        up: bool,
        actor: Option<&str>,
    ) -> Result<Vec<MeetingCase>, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = swap_with_neighbour(&tx, id, up, actor).await;
        crate::finish(tx, result).await
    }

    pub async fn remove_agenda_item(
        &self,
        id: i64,
        actor: Option<&str>,
    ) -> Result<MeetingCase, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = mark_agenda_item_deleted(&tx, id, actor).await;
        crate::finish(tx, result).await
    }

    /// Edit the agenda text, deadline override and follow-up draft of an item.
    ///
    /// An edit that changes nothing records nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for blank agenda text and `NotFound` for an
    /// unknown or removed item.
    pub async fn update_agenda_item(
        &self,
        id: i64,
        update: &AgendaItemUpdate,
        actor: Option<&str>,
    ) -> Result<MeetingCase, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_agenda_item_update(&tx, id, update, actor).await;
        crate::finish(tx, result).await
    }

    pub async fn list_agenda(&self, meeting_id: i64) -> Result<Vec<MeetingCase>, DatabaseError> {
        agenda_for_meeting(self.db().conn(), meeting_id).await
    }
}
