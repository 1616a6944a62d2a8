use anyhow::Context;
use saks_config::SaksConfig;
use saks_db::retry::RetryConfig;
use saks_db::service::SaksService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: SaksService,
    pub config: SaksConfig,
    /// Acting principal passed explicitly into every mutation.
    pub actor: Option<String>,
    pub retry: RetryConfig,
}

impl AppContext {
    /// Apply command-line overrides to `config` and open the database.
    pub async fn init(mut config: SaksConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        if let Some(ref db) = flags.db {
            config.database.path.clone_from(db);
        }
        config.validate()?;

        let service = SaksService::open(&config.database)
            .await
            .with_context(|| format!("failed to open database '{}'", config.database.path))?
            .with_audit_config(config.audit.clone());

        let actor = resolve_actor(flags.actor.as_deref(), &config);
        let retry = RetryConfig::with_attempts(config.general.retry_attempts);
        tracing::debug!(db = %config.database.path, actor = ?actor, "context ready");

        Ok(Self {
            service,
            config,
            actor,
            retry,
        })
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

/// `--actor` wins over `general.default_actor`; blank means a system action.
fn resolve_actor(flag: Option<&str>, config: &SaksConfig) -> Option<String> {
    flag.map(str::trim)
        .filter(|a| !a.is_empty())
        .or_else(|| config.general.default_actor())
        .map(str::to_string)
}
