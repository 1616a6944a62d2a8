use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, EntityType};
use crate::snapshot::Snapshot;

/// An immutable audit record of one state change.
///
/// `id` is assigned by the store in commit order and is the only ordering key;
/// `occurred_at` is informational.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditRecord {
    pub id: i64,
    pub occurred_at: DateTime<Utc>,
    pub actor_id: Option<String>,
    pub entity_type: EntityType,
    /// String so composite keys such as `"12,13"` fit.
    pub entity_id: String,
    pub action: AuditAction,
    pub before: Option<Snapshot>,
    pub after: Option<Snapshot>,
    pub reason: Option<String>,
}
