use clap::ValueEnum;

/// How command results are printed on stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON.
    Json,
    /// One JSON document per line.
    Raw,
}

/// Flags that shape how every command talks to the store and prints.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    /// Replaces `database.path` from configuration.
    pub db: Option<String>,
    /// Recorded as `actor_id` on audit records.
    pub actor: Option<String>,
}
