//! `SaksService` owns the database handle and hosts every repository method.
//!
//! Mutations that touch domain state and the audit trail run inside one
//! `BEGIN IMMEDIATE` transaction, so either both land or neither does.

use saks_config::{AuditConfig, DatabaseConfig};

use crate::SaksDb;
use crate::error::DatabaseError;

pub struct SaksService {
    db: SaksDb,
    audit: AuditConfig,
}

impl SaksService {
    /// Open (or create) the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(SaksDb::open(config).await?))
    }

    /// Open a local database with default connection settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(path: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(SaksDb::open_local(path).await?))
    }

    /// Wrap an already-open database.
    #[must_use]
    pub fn from_db(db: SaksDb) -> Self {
        Self {
            db,
            audit: AuditConfig::default(),
        }
    }

    /// Replace the page-size bounds applied to audit listings.
    #[must_use]
    pub fn with_audit_config(mut self, audit: AuditConfig) -> Self {
        self.audit = audit;
        self
    }

    #[must_use]
    pub const fn db(&self) -> &SaksDb {
        &self.db
    }

    #[must_use]
    pub const fn audit_config(&self) -> &AuditConfig {
        &self.audit
    }
}
