use std::future::Future;

use mongodb::bson::Document;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::store::MigrationSink;
use crate::store::connect::DestinationStore;
use crate::transform::MigratedUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub user_id: String,
    pub tasks_inserted: u64,
}

impl MigrationSink for DestinationStore {
    fn insert_user(&self, user: Document) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.users.insert_one(user).await?;
            Ok(())
        }
    }

    fn insert_tasks(&self, tasks: Vec<Document>) -> impl Future<Output = Result<u64>> + Send {
        async move {
            let result = self.tasks.insert_many(tasks).ordered(false).await?;
            Ok(result.inserted_ids.len() as u64)
        }
    }
}

/// Insert the user and bulk-insert their tasks concurrently.
///
/// Not a transaction: if one write fails the other may already have landed.
pub async fn write_migrated<W: MigrationSink>(
    sink: &W,
    migrated: &MigratedUser,
) -> Result<WriteSummary> {
    let user = migrated.user_document()?;
    let tasks = migrated.task_documents()?;
    debug!(
        user_id = %migrated.user.id,
        tasks = tasks.len(),
        "issuing user insert and task bulk insert"
    );

    // The driver rejects an empty bulk insert.
    let insert_tasks = async {
        if tasks.is_empty() {
            Ok(0)
        } else {
            sink.insert_tasks(tasks).await
        }
    };

    let ((), tasks_inserted) = futures::try_join!(sink.insert_user(user), insert_tasks)?;

    Ok(WriteSummary {
        user_id: migrated.user.id.clone(),
        tasks_inserted,
    })
}
