use clap::Args;

pub const SOURCE_ENV: &str = "MONGODB_OLD";
pub const DESTINATION_ENV: &str = "MONGODB_NEW";
pub const USER_ID_ENV: &str = "USER_ID";

/// Where to read from, where to write to, and which user to move.
///
/// Every value can come from a flag or from the environment; flags win.
/// Connection strings must name their database (`mongodb://host/dbname`).
#[derive(Clone, Args)]
pub struct MigrationConfig {
    /// Connection string of the legacy store
    #[arg(long = "source", env = "MONGODB_OLD", hide_env_values = true)]
    pub source_uri: String,
    /// Connection string of the new store
    #[arg(long = "destination", env = "MONGODB_NEW", hide_env_values = true)]
    pub destination_uri: String,
    /// Identifier of the legacy user to migrate
    #[arg(long, env = "USER_ID")]
    pub user_id: String,
    /// Read and transform, but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

impl MigrationConfig {
    pub fn new(
        source_uri: impl Into<String>,
        destination_uri: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            source_uri: source_uri.into(),
            destination_uri: destination_uri.into(),
            user_id: user_id.into(),
            dry_run: false,
        }
    }
}
