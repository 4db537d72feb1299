use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, Database};
use tracing::debug;

use crate::config::MigrationConfig;
use crate::error::{MigrateError, Result};
use crate::store::{TASKS_COLLECTION, USERS_COLLECTION};

/// Handle on the legacy database.
pub struct SourceStore {
    database: Database,
    pub(crate) users: Collection<Document>,
}

/// Handle on the new-schema database.
pub struct DestinationStore {
    database: Database,
    pub(crate) users: Collection<Document>,
    pub(crate) tasks: Collection<Document>,
}

/// Both live connections for one run.
pub struct Stores {
    pub source: SourceStore,
    pub destination: DestinationStore,
}

impl SourceStore {
    pub fn new(database: Database) -> Self {
        let users = database.collection(USERS_COLLECTION);
        Self { database, users }
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

impl DestinationStore {
    pub fn new(database: Database) -> Self {
        let users = database.collection(USERS_COLLECTION);
        let tasks = database.collection(TASKS_COLLECTION);
        Self {
            database,
            users,
            tasks,
        }
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

impl Stores {
    /// Open and verify both connections concurrently; either failing fails the run.
    pub async fn connect(config: &MigrationConfig) -> Result<Self> {
        let (source, destination) = futures::try_join!(
            open_database(&config.source_uri, "source"),
            open_database(&config.destination_uri, "destination"),
        )?;

        Ok(Self {
            source: SourceStore::new(source),
            destination: DestinationStore::new(destination),
        })
    }
}

async fn open_database(uri: &str, role: &'static str) -> Result<Database> {
    let client = Client::with_uri_str(uri).await?;
    let database = client
        .default_database()
        .ok_or(MigrateError::MissingDatabase(role))?;

    // Clients connect lazily; ping so an unreachable store fails here.
    database.run_command(doc! { "ping": 1 }).await?;
    debug!(role, database = database.name(), "store reachable");

    Ok(database)
}
