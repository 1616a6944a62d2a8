//! Audit trail repository.
//!
//! Append-only records of every state change. `AuditTrail::record` is the only
//! write path and runs on whatever connection or transaction the caller holds,
//! so the record commits or rolls back together with the change it describes.
//! There is no update or delete path; the schema triggers reject both.

use chrono::Utc;
use saks_core::entities::AuditRecord;
use saks_core::enums::{AuditAction, EntityType};
use saks_core::snapshot::Snapshot;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, normalize_text, parse_datetime, parse_enum, parse_optional_snapshot,
};
use crate::service::SaksService;

const AUDIT_COLUMNS: &str =
    "id, occurred_at, actor_id, entity_type, entity_id, action, before_json, after_json, reason";

/// One state change about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub before: Option<Snapshot>,
    pub after: Option<Snapshot>,
    pub reason: Option<String>,
    /// `None` for system and background actions.
    pub actor_id: Option<String>,
}

impl NewAuditRecord {
    #[must_use]
    pub fn new(action: AuditAction, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            action,
            entity_type,
            entity_id: entity_id.into(),
            before: None,
            after: None,
            reason: None,
            actor_id: None,
        }
    }

    #[must_use]
    pub fn before(mut self, snapshot: impl Into<Snapshot>) -> Self {
        self.before = Some(snapshot.into());
        self
    }

    #[must_use]
    pub fn after(mut self, snapshot: impl Into<Snapshot>) -> Self {
        self.after = Some(snapshot.into());
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attribute the record. Blank identifiers count as no actor.
    #[must_use]
    pub fn actor(mut self, actor: Option<&str>) -> Self {
        self.actor_id = normalize_text(actor);
        self
    }
}

/// Filter criteria for audit listings.
#[derive(Debug, Default, Clone)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    /// Substring matched against entity type, entity id and reason.
    pub q: Option<String>,
    pub take: Option<u32>,
}

/// Append-only writer for `audit_events`.
pub struct AuditTrail;

impl AuditTrail {
    /// Append one record and return it as stored.
    ///
    /// `occurred_at` is taken at write time; the id comes from the table's
    /// AUTOINCREMENT key, so records written later in the same transaction get
    /// strictly greater ids.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AuditWrite` if the INSERT fails. Callers inside a
    /// transaction propagate it so the enclosing change rolls back.
    pub async fn record(
        conn: &libsql::Connection,
        record: &NewAuditRecord,
    ) -> Result<AuditRecord, DatabaseError> {
        if record.entity_id.trim().is_empty() {
            return Err(DatabaseError::AuditWrite("entity id must not be blank".into()));
        }

        let now = Utc::now();
        let before = record.before.as_ref().map(Snapshot::to_json);
        let after = record.after.as_ref().map(Snapshot::to_json);

        conn.execute(
            "INSERT INTO audit_events (occurred_at, actor_id, entity_type, entity_id, action, before_json, after_json, reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            libsql::params![
                now.to_rfc3339(),
                record.actor_id.as_deref(),
                record.entity_type.as_str(),
                record.entity_id.as_str(),
                record.action.as_str(),
                before.as_deref(),
                after.as_deref(),
                record.reason.as_deref()
            ],
        )
        .await
        .map_err(|e| {
            DatabaseError::AuditWrite(format!(
                "{} {} {}: {e}",
                record.action, record.entity_type, record.entity_id
            ))
        })?;

        let id = conn.last_insert_rowid();
        tracing::debug!(
            id,
            action = %record.action,
            entity_type = %record.entity_type,
            entity_id = %record.entity_id,
            "audit record appended"
        );

        Ok(AuditRecord {
            id,
            occurred_at: now,
            actor_id: record.actor_id.clone(),
            entity_type: record.entity_type,
            entity_id: record.entity_id.clone(),
            action: record.action,
            before: record.before.clone(),
            after: record.after.clone(),
            reason: record.reason.clone(),
        })
    }
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditRecord, DatabaseError> {
    Ok(AuditRecord {
        id: row.get::<i64>(0)?,
        occurred_at: parse_datetime(&row.get::<String>(1)?)?,
        actor_id: get_opt_string(row, 2)?,
        entity_type: parse_enum(&row.get::<String>(3)?)?,
        entity_id: row.get::<String>(4)?,
        action: parse_enum(&row.get::<String>(5)?)?,
        before: parse_optional_snapshot(get_opt_string(row, 6)?.as_deref())?,
        after: parse_optional_snapshot(get_opt_string(row, 7)?.as_deref())?,
        reason: get_opt_string(row, 8)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<AuditRecord>, DatabaseError> {
    let mut records = Vec::new();
    while let Some(row) = rows.next().await? {
        records.push(row_to_audit(&row)?);
    }
    Ok(records)
}

impl SaksService {
    /// Append a record outside any domain change, in its own transaction.
    ///
    /// For collaborators such as import or backup jobs that report events
    /// they performed themselves.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LockContention` if the write lock is not
    /// acquired, or `DatabaseError::AuditWrite` if the append fails.
    pub async fn record_audit(
        &self,
        record: &NewAuditRecord,
    ) -> Result<AuditRecord, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = AuditTrail::record(&tx, record).await;
        crate::finish(tx, result).await
    }

    /// Full history of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn audit_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditRecord>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {AUDIT_COLUMNS} FROM audit_events
                     WHERE entity_type = ?1 AND entity_id = ?2
                     ORDER BY id ASC"
                ),
                libsql::params![entity_type.as_str(), entity_id],
            )
            .await?;
        collect(rows).await
    }

    /// Query audit records with optional filters, newest first.
    ///
    /// `take` is clamped to the service's [`AuditConfig`](saks_config::AuditConfig)
    /// bounds; `None` lists the configured default page.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditRecord>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            params.push(libsql::Value::Text(format!("%{q}%")));
            let n = params.len();
            conditions.push(format!(
                "(entity_type LIKE ?{n} OR entity_id LIKE ?{n} OR reason LIKE ?{n})"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let take = self.audit_config().clamp_take(filter.take);
        let sql = format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_events {where_clause}
             ORDER BY id DESC LIMIT {take}"
        );

        let rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        collect(rows).await
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no record has this id.
    pub async fn get_audit(&self, id: i64) -> Result<AuditRecord, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {AUDIT_COLUMNS} FROM audit_events WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| DatabaseError::NotFound {
            entity: "audit_event",
            id: id.to_string(),
        })?;
        row_to_audit(&row)
    }
}
