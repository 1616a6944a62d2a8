//! Attachment repository.
//!
//! Only file metadata is stored. Each kind of owner has its own link table so
//! foreign keys stay enforced; unlinking soft-deletes the link and leaves the
//! attachment row in place.

use chrono::Utc;
use serde_json::json;

use saks_core::entities::{Attachment, AttachmentLink, NewAttachment};
use saks_core::enums::{AttachmentTarget, AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string, normalize_text, parse_datetime, parse_optional_datetime};
use crate::repos::audit::{AuditTrail, NewAuditRecord};
use crate::repos::comment::live_comment;
use crate::repos::meeting::{live_agenda_item, live_meeting};
use crate::repos::minutes::fetch_entry;
use crate::service::SaksService;

/// Link table and owner column for a target.
const fn link_table(target: AttachmentTarget) -> (&'static str, &'static str) {
    match target {
        AttachmentTarget::Comment => ("comment_attachments", "case_comment_id"),
        AttachmentTarget::AgendaItem => ("agenda_item_attachments", "meeting_case_id"),
        AttachmentTarget::MinutesEntry => ("minutes_entry_attachments", "minutes_entry_id"),
        AttachmentTarget::SignedMinutes => ("signed_minutes_attachments", "meeting_id"),
    }
}

const fn upload_reason(target: AttachmentTarget) -> &'static str {
    match target {
        AttachmentTarget::Comment => "Uploaded comment attachment",
        AttachmentTarget::AgendaItem => "Uploaded agenda attachment",
        AttachmentTarget::MinutesEntry => "Uploaded minutes entry attachment",
        AttachmentTarget::SignedMinutes => "Linked signed minutes",
    }
}

const fn unlink_reason(target: AttachmentTarget) -> &'static str {
    match target {
        AttachmentTarget::Comment => "Unlinked attachment from comment",
        AttachmentTarget::AgendaItem => "Unlinked agenda attachment",
        AttachmentTarget::MinutesEntry => "Unlinked minutes entry attachment",
        AttachmentTarget::SignedMinutes => "Unlinked signed minutes",
    }
}

fn link_select(target: AttachmentTarget) -> String {
    let (table, owner) = link_table(target);
    format!(
        "SELECT l.id, l.{owner}, l.is_deleted, l.deleted_at, l.deleted_by,
                a.id, a.original_file_name, a.content_type, a.size_bytes, a.uploaded_at,
                a.uploaded_by, a.is_deleted, a.deleted_at, a.deleted_by
         FROM {table} l JOIN attachments a ON a.id = l.attachment_id"
    )
}

fn row_to_link(target: AttachmentTarget, row: &libsql::Row) -> Result<AttachmentLink, DatabaseError> {
    let attachment = Attachment {
        id: row.get::<i64>(5)?,
        original_file_name: row.get::<String>(6)?,
        content_type: row.get::<String>(7)?,
        size_bytes: row.get::<i64>(8)?,
        uploaded_at: parse_datetime(&row.get::<String>(9)?)?,
        uploaded_by: get_opt_string(row, 10)?,
        is_deleted: get_flag(row, 11)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        deleted_by: get_opt_string(row, 13)?,
    };
    Ok(AttachmentLink {
        id: row.get::<i64>(0)?,
        target,
        target_id: row.get::<i64>(1)?,
        attachment,
        is_deleted: get_flag(row, 2)?,
        deleted_at: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        deleted_by: get_opt_string(row, 4)?,
    })
}

/// Fail with `NotFound` unless the owner of a new link is live.
async fn ensure_owner(
    conn: &libsql::Connection,
    target: AttachmentTarget,
    target_id: i64,
) -> Result<(), DatabaseError> {
    match target {
        AttachmentTarget::Comment => {
            live_comment(conn, target_id).await?;
        }
        AttachmentTarget::AgendaItem => {
            live_agenda_item(conn, target_id).await?;
        }
        AttachmentTarget::MinutesEntry => {
            let entry = fetch_entry(conn, target_id).await?;
            live_meeting(conn, entry.meeting_id).await?;
        }
        AttachmentTarget::SignedMinutes => {
            live_meeting(conn, target_id).await?;
        }
    }
    Ok(())
}

fn validate_upload(
    target: AttachmentTarget,
    input: &NewAttachment,
) -> Result<(String, String), DatabaseError> {
    let file_name = normalize_text(Some(input.file_name.as_str()))
        .ok_or_else(|| DatabaseError::InvalidState("attachment file name must not be blank".into()))?;
    if input.size_bytes <= 0 {
        return Err(DatabaseError::InvalidState(format!(
            "attachment {file_name} is empty"
        )));
    }
    if !target.accepts(&input.content_type) {
        return Err(DatabaseError::InvalidState(format!(
            "content type {} is not allowed for {target} attachments",
            input.content_type.trim()
        )));
    }
    Ok((file_name, input.content_type.trim().to_ascii_lowercase()))
}

async fn link_new_attachment(
    conn: &libsql::Connection,
    target: AttachmentTarget,
    target_id: i64,
    input: &NewAttachment,
    actor: Option<&str>,
) -> Result<AttachmentLink, DatabaseError> {
    let (file_name, content_type) = validate_upload(target, input)?;
    ensure_owner(conn, target, target_id).await?;

    let now = Utc::now();
    let uploaded_by = normalize_text(actor);
    conn.execute(
        "INSERT INTO attachments (original_file_name, content_type, size_bytes, uploaded_at, uploaded_by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            file_name.as_str(),
            content_type.as_str(),
            input.size_bytes,
            now.to_rfc3339(),
            uploaded_by.as_deref()
        ],
    )
    .await?;
    let attachment = Attachment {
        id: conn.last_insert_rowid(),
        original_file_name: file_name,
        content_type,
        size_bytes: input.size_bytes,
        uploaded_at: now,
        uploaded_by,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    };
    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Create, EntityType::Attachment, attachment.id.to_string())
            .after(json!({
                "id": attachment.id,
                "original_file_name": attachment.original_file_name,
                "content_type": attachment.content_type,
                "size_bytes": attachment.size_bytes,
                "uploaded_at": attachment.uploaded_at,
            }))
            .actor(actor),
    )
    .await?;

    let (table, owner) = link_table(target);
    conn.execute(
        &format!("INSERT INTO {table} ({owner}, attachment_id) VALUES (?1, ?2)"),
        libsql::params![target_id, attachment.id],
    )
    .await?;
    let link = AttachmentLink {
        id: conn.last_insert_rowid(),
        target,
        target_id,
        attachment,
        is_deleted: false,
        deleted_at: None,
        deleted_by: None,
    };
    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::Create, target.link_entity(), link.id.to_string())
            .after(json!({
                "id": link.id,
                owner: target_id,
                "attachment_id": link.attachment.id,
            }))
            .reason(upload_reason(target))
            .actor(actor),
    )
    .await?;

    if target == AttachmentTarget::SignedMinutes {
        AuditTrail::record(
            conn,
            &NewAuditRecord::new(
                AuditAction::UploadSignedMinutes,
                EntityType::Meeting,
                target_id.to_string(),
            )
            .after(json!({
                "meeting_id": target_id,
                "attachment_id": link.attachment.id,
                "original_file_name": link.attachment.original_file_name,
                "size_bytes": link.attachment.size_bytes,
            }))
            .reason("Uploaded signed/scanned minutes")
            .actor(actor),
        )
        .await?;
    }

    Ok(link)
}

async fn live_link(
    conn: &libsql::Connection,
    target: AttachmentTarget,
    id: i64,
) -> Result<AttachmentLink, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("{} WHERE l.id = ?1 AND l.is_deleted = 0", link_select(target)),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
        entity: "attachment_link",
        id: format!("{target}:{id}"),
    })?;
    row_to_link(target, &row)
}

async fn mark_link_deleted(
    conn: &libsql::Connection,
    target: AttachmentTarget,
    id: i64,
    actor: Option<&str>,
) -> Result<AttachmentLink, DatabaseError> {
    let current = live_link(conn, target, id).await?;
    let now = Utc::now();
    let deleted_by = normalize_text(actor);
    let (table, owner) = link_table(target);

    conn.execute(
        &format!("UPDATE {table} SET is_deleted = 1, deleted_at = ?1, deleted_by = ?2 WHERE id = ?3"),
        libsql::params![now.to_rfc3339(), deleted_by.as_deref(), id],
    )
    .await?;

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(AuditAction::SoftDelete, target.link_entity(), id.to_string())
            .before(json!({
                "is_deleted": false,
                owner: current.target_id,
                "attachment_id": current.attachment.id,
            }))
            .after(json!({ "is_deleted": true, "deleted_at": now, "deleted_by": deleted_by }))
            .reason(unlink_reason(target))
            .actor(actor),
    )
    .await?;

    Ok(AttachmentLink {
        is_deleted: true,
        deleted_at: Some(now),
        deleted_by,
        ..current
    })
}

impl SaksService {
    /// Register an uploaded file and link it to a comment, agenda item,
    /// minutes entry or meeting.
    ///
    /// Writes a `Create` record for the attachment and one for the link.
    /// Signed minutes also get an `UploadSignedMinutes` record on the meeting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` for a blank file name, an empty file or a
    /// content type the target does not take, and `NotFound` when the owner
    /// is unknown or deleted.
    pub async fn attach_file(
        &self,
        target: AttachmentTarget,
        target_id: i64,
        input: &NewAttachment,
        actor: Option<&str>,
    ) -> Result<AttachmentLink, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = link_new_attachment(&tx, target, target_id, input, actor).await;
        crate::finish(tx, result).await
    }

    /// Record the signed or scanned minutes of a meeting. Only PDFs are taken.
    pub async fn record_signed_minutes(
        &self,
        meeting_id: i64,
        input: &NewAttachment,
        actor: Option<&str>,
    ) -> Result<AttachmentLink, DatabaseError> {
        self.attach_file(AttachmentTarget::SignedMinutes, meeting_id, input, actor)
            .await
    }

    /// Remove a link. The attachment metadata stays for the audit trail.
    pub async fn unlink_attachment(
        &self,
        target: AttachmentTarget,
        link_id: i64,
        actor: Option<&str>,
    ) -> Result<AttachmentLink, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = mark_link_deleted(&tx, target, link_id, actor).await;
        crate::finish(tx, result).await
    }

    /// Live links of one owner, oldest first.
    pub async fn list_attachments(
        &self,
        target: AttachmentTarget,
        target_id: i64,
    ) -> Result<Vec<AttachmentLink>, DatabaseError> {
        let (_, owner) = link_table(target);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "{} WHERE l.{owner} = ?1 AND l.is_deleted = 0 ORDER BY l.id ASC",
                    link_select(target)
                ),
                [target_id],
            )
            .await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(row_to_link(target, &row)?);
        }
        Ok(links)
    }
}
