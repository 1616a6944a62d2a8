//! Board case repository: numbered creation, edits with state changes, soft delete.

use chrono::{NaiveDate, Utc};
use serde_json::json;

use saks_core::entities::{BoardCase, NewCase};
use saks_core::enums::{AuditAction, CaseStatus, EntityType};
use saks_core::errors::CoreError;
use saks_core::sequence::SequenceScope;

use crate::error::DatabaseError;
use crate::helpers::{
    format_optional_date, get_flag, get_opt_string, normalize_text, parse_date, parse_datetime,
    parse_enum, parse_optional_date, parse_optional_datetime,
};
use crate::repos::audit::{AuditTrail, NewAuditRecord};
use crate::repos::sequence::{next_in_scope, reservation_error};
use crate::service::SaksService;
use crate::updates::case::CaseUpdate;

const CASE_COLUMNS: &str = "id, case_number, title, description, theme, priority, assignee_user_id, \
     start_date, status, closed_date, custom_deadline_date, custom_deadline_text, created_at, \
     updated_at, is_deleted, deleted_at, deleted_by";

fn row_to_case(row: &libsql::Row) -> Result<BoardCase, DatabaseError> {
    Ok(BoardCase {
        id: row.get::<i64>(0)?,
        case_number: row.get::<i64>(1)?,
        title: row.get::<String>(2)?,
        description: get_opt_string(row, 3)?,
        theme: get_opt_string(row, 4)?,
        priority: parse_enum(&row.get::<String>(5)?)?,
        assignee_user_id: row.get::<String>(6)?,
        start_date: parse_date(&row.get::<String>(7)?)?,
        status: parse_enum(&row.get::<String>(8)?)?,
        closed_date: parse_optional_date(get_opt_string(row, 9)?.as_deref())?,
        custom_deadline_date: parse_optional_date(get_opt_string(row, 10)?.as_deref())?,
        custom_deadline_text: get_opt_string(row, 11)?,
        created_at: parse_datetime(&row.get::<String>(12)?)?,
        updated_at: parse_datetime(&row.get::<String>(13)?)?,
        is_deleted: get_flag(row, 14)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 15)?.as_deref())?,
        deleted_by: get_opt_string(row, 16)?,
    })
}

/// Any case by id, deleted or not.
pub(crate) async fn fetch_case(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<BoardCase>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {CASE_COLUMNS} FROM board_cases WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_case(&row)?)),
        None => Ok(None),
    }
}

/// A case that exists and has not been soft-deleted.
pub(crate) async fn live_case(conn: &libsql::Connection, id: i64) -> Result<BoardCase, DatabaseError> {
    fetch_case(conn, id)
        .await?
        .filter(|c| !c.is_deleted)
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "board_case",
            id: id.to_string(),
        })
}

/// Fields covered by the `Update` audit record. Status has its own record.
fn editable_snapshot(case: &BoardCase) -> serde_json::Value {
    json!({
        "title": case.title,
        "description": case.description,
        "theme": case.theme,
        "priority": case.priority,
        "assignee_user_id": case.assignee_user_id,
        "start_date": case.start_date,
        "closed_date": case.closed_date,
        "custom_deadline_date": case.custom_deadline_date,
        "custom_deadline_text": case.custom_deadline_text,
    })
}

/// A date the caller supplies is stored as given. Otherwise a status change
/// adjusts it: closing stamps `today` when no date is set, reopening clears it.
fn reconcile_closed_date(
    previous: Option<CaseStatus>,
    status: CaseStatus,
    closed_date: Option<NaiveDate>,
    supplied: bool,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if supplied || previous == Some(status) {
        return closed_date;
    }
    match status {
        CaseStatus::Closed => closed_date.or(Some(today)),
        CaseStatus::Open => None,
    }
}

/// Filters for [`SaksService::list_cases`]. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub assignee_user_id: Option<String>,
}

impl CaseFilter {
    /// Open cases only, the register's default view.
    #[must_use]
    pub fn open() -> Self {
        Self {
            status: Some(CaseStatus::Open),
            ..Self::default()
        }
    }
}

fn required_title(title: &str) -> Result<String, DatabaseError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DatabaseError::InvalidState("case title must not be blank".into()));
    }
    Ok(title.to_string())
}

async fn insert_case(
    conn: &libsql::Connection,
    input: &NewCase,
    actor: Option<&str>,
) -> Result<BoardCase, DatabaseError> {
    let title = required_title(&input.title)?;
    let now = Utc::now();
    let closed_date = reconcile_closed_date(
        None,
        input.status,
        input.closed_date,
        input.closed_date.is_some(),
        now.date_naive(),
    );

    let case_number = next_in_scope(conn, SequenceScope::CaseNumber).await?;

    conn.execute(
        "INSERT INTO board_cases (case_number, title, description, theme, priority, assignee_user_id,
             start_date, status, closed_date, custom_deadline_date, custom_deadline_text, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        libsql::params![
            case_number,
            title.as_str(),
            normalize_text(input.description.as_deref()),
            normalize_text(input.theme.as_deref()),
            input.priority.as_str(),
            input.assignee_user_id.trim(),
            input.start_date.format("%Y-%m-%d").to_string(),
            input.status.as_str(),
            format_optional_date(closed_date),
            format_optional_date(input.custom_deadline_date),
            normalize_text(input.custom_deadline_text.as_deref()),
            now.to_rfc3339(),
            now.to_rfc3339()
        ],
    )
    .await
    .map_err(|e| reservation_error(SequenceScope::CaseNumber, e))?;

    let id = conn.last_insert_rowid();
    let case = fetch_case(conn, id).await?.ok_or(DatabaseError::NoResult)?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Create, EntityType::BoardCase, id.to_string())
            .after(json!({
                "id": case.id,
                "case_number": case.case_number,
                "title": case.title,
                "priority": case.priority,
                "assignee_user_id": case.assignee_user_id,
                "status": case.status,
            }))
            .actor(actor),
    )
    .await?;

    tracing::debug!(id, case_number, "case created");
    Ok(case)
}

async fn apply_case_update(
    conn: &libsql::Connection,
    id: i64,
    update: &CaseUpdate,
    actor: Option<&str>,
) -> Result<BoardCase, DatabaseError> {
    let current = live_case(conn, id).await?;
    let mut next = current.clone();

    if let Some(ref title) = update.title {
        next.title = required_title(title)?;
    }
    if let Some(ref description) = update.description {
        next.description = normalize_text(description.as_deref());
    }
    if let Some(ref theme) = update.theme {
        next.theme = normalize_text(theme.as_deref());
    }
    if let Some(priority) = update.priority {
        next.priority = priority;
    }
    if let Some(ref assignee) = update.assignee_user_id {
        next.assignee_user_id = assignee.trim().to_string();
    }
    if let Some(start_date) = update.start_date {
        next.start_date = start_date;
    }
    if let Some(closed_date) = update.closed_date {
        next.closed_date = closed_date;
    }
    if let Some(deadline) = update.custom_deadline_date {
        next.custom_deadline_date = deadline;
    }
    if let Some(ref text) = update.custom_deadline_text {
        next.custom_deadline_text = normalize_text(text.as_deref());
    }
    if let Some(status) = update.status {
        if status != current.status && !current.status.can_transition_to(status) {
            return Err(CoreError::InvalidTransition {
                case_id: id,
                from: current.status,
                to: status,
            }
            .into());
        }
        next.status = status;
    }

    let now = Utc::now();
    next.closed_date = reconcile_closed_date(
        Some(current.status),
        next.status,
        next.closed_date,
        update.closed_date.is_some(),
        now.date_naive(),
    );

    let before = editable_snapshot(&current);
    let after = editable_snapshot(&next);
    let fields_changed = before != after;
    let status_changed = next.status != current.status;

    if !fields_changed && !status_changed {
        return Ok(current);
    }

    conn.execute(
        "UPDATE board_cases SET title = ?1, description = ?2, theme = ?3, priority = ?4,
             assignee_user_id = ?5, start_date = ?6, status = ?7, closed_date = ?8,
             custom_deadline_date = ?9, custom_deadline_text = ?10, updated_at = ?11
         WHERE id = ?12",
        libsql::params![
            next.title.as_str(),
            next.description.as_deref(),
            next.theme.as_deref(),
            next.priority.as_str(),
            next.assignee_user_id.as_str(),
            next.start_date.format("%Y-%m-%d").to_string(),
            next.status.as_str(),
            format_optional_date(next.closed_date),
            format_optional_date(next.custom_deadline_date),
            next.custom_deadline_text.as_deref(),
            now.to_rfc3339(),
            id
        ],
    )
    .await?;

    if fields_changed {
        AuditTrail::record(
            conn,
            &NewAuditRecord::new(AuditAction::Update, EntityType::BoardCase, id.to_string())
                .before(before)
                .after(after)
                .actor(actor),
        )
        .await?;
    }
    if status_changed {
        AuditTrail::record(
            conn,
            &NewAuditRecord::new(AuditAction::StateChange, EntityType::BoardCase, id.to_string())
                .before(json!({ "status": current.status }))
                .after(json!({ "status": next.status }))
                .actor(actor),
        )
        .await?;
    }

    next.updated_at = now;
    Ok(next)
}

async fn mark_case_deleted(
    conn: &libsql::Connection,
    id: i64,
    actor: Option<&str>,
) -> Result<BoardCase, DatabaseError> {
    let current = live_case(conn, id).await?;
    let now = Utc::now();
    let deleted_by = normalize_text(actor);

    conn.execute(
        "UPDATE board_cases SET is_deleted = 1, deleted_at = ?1, deleted_by = ?2, updated_at = ?1
         WHERE id = ?3",
        libsql::params![now.to_rfc3339(), deleted_by.as_deref(), id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::SoftDelete, EntityType::BoardCase, id.to_string())
            .before(json!({ "is_deleted": false }))
            .after(json!({
                "is_deleted": true,
                "deleted_at": now,
                "deleted_by": deleted_by,
                "case_number": current.case_number,
                "title": current.title,
            }))
            .actor(actor),
    )
    .await?;

    Ok(BoardCase {
        is_deleted: true,
        deleted_at: Some(now),
        deleted_by,
        updated_at: now,
        ..current
    })
}

impl SaksService {
    /// Create a case with the next case number.
    ///
    /// Number allocation, the insert and the `Create` audit record commit
    /// together.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for a blank title, `LockContention` or
    /// `AllocationConflict` when another writer interferes.
    pub async fn create_case(
        &self,
        input: &NewCase,
        actor: Option<&str>,
    ) -> Result<BoardCase, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = insert_case(&tx, input, actor).await;
        crate::finish(tx, result).await
    }

    /// Apply an edit. Field edits produce an `Update` record and a status
    /// change a separate `StateChange` record, in that order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or deleted cases and `InvalidState` for a
    /// blank title.
    pub async fn update_case(
        &self,
        id: i64,
        update: &CaseUpdate,
        actor: Option<&str>,
    ) -> Result<BoardCase, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_case_update(&tx, id, update, actor).await;
        crate::finish(tx, result).await
    }

    /// Soft-delete a case. Its number stays taken.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown or already deleted cases.
    pub async fn soft_delete_case(
        &self,
        id: i64,
        actor: Option<&str>,
    ) -> Result<BoardCase, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = mark_case_deleted(&tx, id, actor).await;
        crate::finish(tx, result).await
    }

    pub async fn get_case(&self, id: i64) -> Result<BoardCase, DatabaseError> {
        live_case(self.db().conn(), id).await
    }

    /// Live cases matching `filter`, highest case number first.
    pub async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<BoardCase>, DatabaseError> {
        let mut conditions = vec!["is_deleted = 0".to_string()];
        let mut params: Vec<libsql::Value> = Vec::new();
        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(assignee) = normalize_text(filter.assignee_user_id.as_deref()) {
            params.push(libsql::Value::Text(assignee));
            conditions.push(format!("assignee_user_id = ?{}", params.len()));
        }

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CASE_COLUMNS} FROM board_cases
                     WHERE {}
                     ORDER BY case_number DESC",
                    conditions.join(" AND ")
                ),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut cases = Vec::new();
        while let Some(row) = rows.next().await? {
            cases.push(row_to_case(&row)?);
        }
        Ok(cases)
    }
}
