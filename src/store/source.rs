use std::future::Future;

use mongodb::bson::{Document, doc};

use crate::error::{MigrateError, Result};
use crate::legacy::LegacyUser;
use crate::store::LegacyUsers;
use crate::store::connect::SourceStore;

impl LegacyUsers for SourceStore {
    fn find_user(&self, user_id: &str) -> impl Future<Output = Result<Option<Document>>> + Send {
        let filter = doc! { "_id": user_id };
        async move { Ok(self.users.find_one(filter).await?) }
    }
}

/// Fetch and decode one legacy user.
pub async fn fetch_legacy_user<S: LegacyUsers>(source: &S, user_id: &str) -> Result<LegacyUser> {
    let document = source
        .find_user(user_id)
        .await?
        .ok_or_else(|| MigrateError::UserNotFound(user_id.to_string()))?;
    LegacyUser::from_document(document)
}
