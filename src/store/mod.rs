pub mod connect;
pub mod source;
pub mod writer;

use std::future::Future;

use mongodb::bson::Document;

use crate::error::Result;

pub const USERS_COLLECTION: &str = "users";
pub const TASKS_COLLECTION: &str = "tasks";

/// Read side: the legacy users collection.
pub trait LegacyUsers {
    /// At most one raw user document with this `_id`.
    fn find_user(&self, user_id: &str) -> impl Future<Output = Result<Option<Document>>> + Send;
}

/// Write side: the new users and tasks collections.
pub trait MigrationSink {
    fn insert_user(&self, user: Document) -> impl Future<Output = Result<()>> + Send;

    /// Unordered bulk insert; returns how many documents were inserted.
    fn insert_tasks(&self, tasks: Vec<Document>) -> impl Future<Output = Result<u64>> + Send;
}
