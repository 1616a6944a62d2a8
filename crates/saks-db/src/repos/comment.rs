//! Case comment repository.

use chrono::Utc;
use serde_json::json;

use saks_core::entities::CaseComment;
use saks_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string, normalize_text, parse_datetime, parse_optional_datetime};
use crate::repos::audit::{AuditTrail, NewAuditRecord};
use crate::repos::case::live_case;
use crate::service::SaksService;

const COMMENT_COLUMNS: &str =
    "id, case_id, text, created_at, created_by, is_deleted, deleted_at, deleted_by";

fn row_to_comment(row: &libsql::Row) -> Result<CaseComment, DatabaseError> {
    Ok(CaseComment {
        id: row.get::<i64>(0)?,
        case_id: row.get::<i64>(1)?,
        text: row.get::<String>(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
        created_by: get_opt_string(row, 4)?,
        is_deleted: get_flag(row, 5)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        deleted_by: get_opt_string(row, 7)?,
    })
}

pub(crate) async fn live_comment(conn: &libsql::Connection, id: i64) -> Result<CaseComment, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {COMMENT_COLUMNS} FROM case_comments WHERE id = ?1 AND is_deleted = 0"),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "case_comment",
        id: id.to_string(),
    })?;
    row_to_comment(&row)
}

/// Live comments of a case, oldest first.
pub(crate) async fn comments_for_case(
    conn: &libsql::Connection,
    case_id: i64,
) -> Result<Vec<CaseComment>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {COMMENT_COLUMNS} FROM case_comments
                 WHERE case_id = ?1 AND is_deleted = 0
                 ORDER BY created_at ASC, id ASC"
            ),
            [case_id],
        )
        .await?;
    let mut comments = Vec::new();
    while let Some(row) = rows.next().await? {
        comments.push(row_to_comment(&row)?);
    }
    Ok(comments)
}

async fn insert_comment(
    conn: &libsql::Connection,
    case_id: i64,
    text: &str,
    actor: Option<&str>,
) -> Result<CaseComment, DatabaseError> {
    let text = normalize_text(Some(text))
        .ok_or_else(|| DatabaseError::InvalidState("comment text must not be blank".into()))?;
    live_case(conn, case_id).await?;

    let now = Utc::now();
    let created_by = normalize_text(actor);
    conn.execute(
        "INSERT INTO case_comments (case_id, text, created_at, created_by) VALUES (?1, ?2, ?3, ?4)",
        libsql::params![case_id, text.as_str(), now.to_rfc3339(), created_by.as_deref()],
    )
    .await?;

    let comment = CaseComment {
        id: conn.last_insert_rowid(),
        case_id,
        text,
        created_at: now,
        created_by,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    };

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Create, EntityType::CaseComment, comment.id.to_string())
            .after(json!({ "case_id": case_id, "text": comment.text }))
            .actor(actor),
    )
    .await?;

    Ok(comment)
}

async fn mark_comment_deleted(
    conn: &libsql::Connection,
    id: i64,
    actor: Option<&str>,
) -> Result<CaseComment, DatabaseError> {
    let current = live_comment(conn, id).await?;
    let now = Utc::now();
    let deleted_by = normalize_text(actor);

    conn.execute(
        "UPDATE case_comments SET is_deleted = 1, deleted_at = ?1, deleted_by = ?2 WHERE id = ?3",
        libsql::params![now.to_rfc3339(), deleted_by.as_deref(), id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::SoftDelete, EntityType::CaseComment, id.to_string())
            .before(json!({ "is_deleted": false, "text": current.text }))
            .after(json!({ "is_deleted": true, "deleted_at": now, "deleted_by": deleted_by }))
            .reason("Soft deleted comment")
            .actor(actor),
    )
    .await?;

    Ok(CaseComment {
        is_deleted: true,
        deleted_at: Some(now),
        deleted_by,
        ..current
    })
}

async fn rewrite_comment(
    conn: &libsql::Connection,
    id: i64,
    text: &str,
    actor: Option<&str>,
) -> Result<CaseComment, DatabaseError> {
    let text = normalize_text(Some(text))
        .ok_or_else(|| DatabaseError::InvalidState("comment text must not be blank".into()))?;
    let current = live_comment(conn, id).await?;
    if current.text == text {
        return Ok(current);
    }

    conn.execute(
        "UPDATE case_comments SET text = ?1 WHERE id = ?2",
        libsql::params![text.as_str(), id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Update, EntityType::CaseComment, id.to_string())
            .before(json!({ "case_id": current.case_id, "text": current.text }))
            .after(json!({ "case_id": current.case_id, "text": text }))
            .reason("Edited comment")
            .actor(actor),
    )
    .await?;

    Ok(CaseComment { text, ..current })
}

impl SaksService {
    /// Add a comment to a live case. Text is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for blank text and `NotFound` for unknown or
    /// deleted cases.
    pub async fn add_comment(
        &self,
        case_id: i64,
        text: &str,
        actor: Option<&str>,
    ) -> Result<CaseComment, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = insert_comment(&tx, case_id, text, actor).await;
        crate::finish(tx, result).await
    }

    /// Replace a comment's text. Unchanged text records nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for blank text and `NotFound` for unknown or
    /// deleted comments.
    pub async fn edit_comment(
        &self,
        id: i64,
        text: &str,
        actor: Option<&str>,
    ) -> Result<CaseComment, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = rewrite_comment(&tx, id, text, actor).await;
        crate::finish(tx, result).await
    }

    pub async fn soft_delete_comment(
        &self,
        id: i64,
        actor: Option<&str>,
    ) -> Result<CaseComment, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = mark_comment_deleted(&tx, id, actor).await;
        crate::finish(tx, result).await
    }

    pub async fn list_comments(&self, case_id: i64) -> Result<Vec<CaseComment>, DatabaseError> {
        comments_for_case(self.db().conn(), case_id).await
    }
}
