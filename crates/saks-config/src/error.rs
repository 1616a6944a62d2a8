use thiserror::Error;

/// Failure to build a usable [`crate::SaksConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `SAKS_*` variable could not be read into the config.
    #[error("failed to read saks configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A value parsed but is out of range.
    #[error("{field} is invalid: {reason}")]
    InvalidValue { field: String, reason: String },
}
