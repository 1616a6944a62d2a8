//! Gap-free sequence allocation.
//!
//! A scope's current value is the maximum number already allocated in it; the
//! next value is that plus one. The read and the reserving write must happen
//! inside one `BEGIN IMMEDIATE` transaction so no other writer can observe the
//! same maximum. The unique indexes on `board_cases.case_number` and
//! `pdf_generations (meeting_id, document_type, sequence_number)` back this up:
//! a reservation that slips past the lock fails with `AllocationConflict`
//! instead of duplicating a number.

use chrono::Utc;
use saks_core::entities::PdfGeneration;
use saks_core::enums::{AuditAction, EntityType, PdfDocumentType};
use saks_core::sequence::SequenceScope;
use serde_json::json;

use crate::error::DatabaseError;
use crate::helpers::normalize_text;
use crate::repos::audit::{AuditTrail, NewAuditRecord};
use crate::repos::meeting::fetch_meeting;
use crate::retry::is_unique_violation;
use crate::service::SaksService;

/// Highest number allocated so far in `scope`, or 0 for an empty scope.
///
/// Soft-deleted cases still hold their numbers, so they count.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn current_max(
    conn: &libsql::Connection,
    scope: SequenceScope,
) -> Result<i64, DatabaseError> {
    let mut rows = match scope {
        SequenceScope::CaseNumber => {
            conn.query("SELECT COALESCE(MAX(case_number), 0) FROM board_cases", ())
                .await?
        }
        SequenceScope::Pdf {
            meeting_id,
            document_type,
        } => {
            conn.query(
                "SELECT COALESCE(MAX(sequence_number), 0) FROM pdf_generations
                 WHERE meeting_id = ?1 AND document_type = ?2",
                libsql::params![meeting_id, document_type.as_str()],
            )
            .await?
        }
    };
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

/// Next number for `scope`. Only meaningful inside a write transaction that
/// also inserts the reserving row.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn next_in_scope(
    conn: &libsql::Connection,
    scope: SequenceScope,
) -> Result<i64, DatabaseError> {
    Ok(current_max(conn, scope).await? + 1)
}

/// Map a failed reservation INSERT, turning uniqueness violations into
/// `AllocationConflict`.
pub(crate) fn reservation_error(scope: SequenceScope, e: libsql::Error) -> DatabaseError {
    if is_unique_violation(&e) {
        DatabaseError::AllocationConflict(format!("{scope}: {e}"))
    } else {
        e.into()
    }
}

async fn reserve_pdf(
    conn: &libsql::Connection,
    meeting_id: i64,
    document_type: PdfDocumentType,
    actor: Option<&str>,
) -> Result<PdfGeneration, DatabaseError> {
    let meeting = fetch_meeting(conn, meeting_id)
        .await?
        .filter(|m| !m.is_deleted)
        .ok_or_else(|| {
            DatabaseError::InvalidScope(format!("meeting {meeting_id} does not exist"))
        })?;

    let scope = SequenceScope::pdf(meeting_id, document_type);
    let sequence_number = next_in_scope(conn, scope).await?;
    let now = Utc::now();
    let generated_by = normalize_text(actor);

    conn.execute(
        "INSERT INTO pdf_generations (meeting_id, document_type, sequence_number, generated_at, generated_by)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            meeting_id,
            document_type.as_str(),
            sequence_number,
            now.to_rfc3339(),
            generated_by.as_deref()
        ],
    )
    .await
    .map_err(|e| reservation_error(scope, e))?;

    let generation = PdfGeneration {
        id: conn.last_insert_rowid(),
        meeting_id,
        document_type,
        sequence_number,
        generated_at: now,
        generated_by,
    };

    AuditTrail::record(
        conn,
        &NewAuditRecord::new(
            AuditAction::GeneratePdf,
            EntityType::Meeting,
            meeting_id.to_string(),
        )
        .after(json!({
            "pdf_generation_id": generation.id,
            "document_type": document_type,
            "sequence_number": sequence_number,
            "file_name": generation.file_name(&meeting),
        }))
        .actor(actor),
    )
    .await?;

    tracing::debug!(%scope, sequence_number, "sequence allocated");
    Ok(generation)
}

impl SaksService {
    /// Reserve the next PDF version number for a meeting and document type.
    ///
    /// Validation, the `max + 1` read, the reservation row and the
    /// `GeneratePdf` audit record share one immediate transaction. Nothing is
    /// retried here; a failed attempt leaves no row behind, so the caller may
    /// repeat it.
    ///
    /// # Errors
    ///
    /// - `InvalidScope` if the meeting is unknown or soft-deleted.
    /// - `LockContention` if the write lock is not acquired in time.
    /// - `AllocationConflict` if the reservation lost a uniqueness race.
    /// - `AuditWrite` if the audit append fails.
    pub async fn allocate_pdf_sequence(
        &self,
        meeting_id: i64,
        document_type: PdfDocumentType,
        actor: Option<&str>,
    ) -> Result<PdfGeneration, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = reserve_pdf(&tx, meeting_id, document_type, actor).await;
        crate::finish(tx, result).await
    }

    /// Preview the number the next allocation in `scope` would receive.
    ///
    /// Read-only; a concurrent writer may take the number first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScope` for a PDF scope without a live meeting.
    pub async fn peek_next(&self, scope: SequenceScope) -> Result<i64, DatabaseError> {
        let conn = self.db().conn();
        if let SequenceScope::Pdf { meeting_id, .. } = scope {
            let live = fetch_meeting(conn, meeting_id)
                .await?
                .is_some_and(|m| !m.is_deleted);
            if !live {
                return Err(DatabaseError::InvalidScope(format!(
                    "meeting {meeting_id} does not exist"
                )));
            }
        }
        next_in_scope(conn, scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_is_allocation_conflict() {
        let err = reservation_error(
            SequenceScope::CaseNumber,
            libsql::Error::SqliteFailure(
                2067,
                "UNIQUE constraint failed: board_cases.case_number".into(),
            ),
        );
        assert!(matches!(err, DatabaseError::AllocationConflict(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn busy_reservation_is_lock_contention() {
        let err = reservation_error(
            SequenceScope::pdf(1, PdfDocumentType::Minutes),
            libsql::Error::SqliteFailure(5, "database is locked".into()),
        );
        assert!(matches!(err, DatabaseError::LockContention(_)));
    }

    #[tokio::test]
    async fn empty_scope_max_is_zero() {
        let svc = SaksService::new_local(":memory:").await.unwrap();
        let conn = svc.db().conn();
        assert_eq!(current_max(conn, SequenceScope::CaseNumber).await.unwrap(), 0);
        assert_eq!(
            next_in_scope(conn, SequenceScope::pdf(3, PdfDocumentType::Agenda))
                .await
                .unwrap(),
            1
        );
    }
}
