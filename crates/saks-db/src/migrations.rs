//! Embedded schema, applied every time a store is opened.

use crate::SaksDb;
use crate::error::DatabaseError;

/// Named migration scripts, applied in order. Each one must be safe to re-run.
const MIGRATIONS: &[(&str, &str)] = &[
    ("001_initial", include_str!("../migrations/001_initial.sql")),
    ("002_attachments", include_str!("../migrations/002_attachments.sql")),
];

impl SaksDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "schema applied");
        }
        Ok(())
    }
}
