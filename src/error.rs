use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("{0} connection string does not name a database")]
    MissingDatabase(&'static str),

    #[error("user {0} not found in source store")]
    UserNotFound(String),

    #[error("user {user}: tag {tag} has no name (tags must have a name)")]
    TagMissingName { user: String, tag: String },

    #[error("legacy record does not match the legacy schema: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("could not encode new-schema document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("database error: {0}")]
    Db(#[from] mongodb::error::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDatabase(_) => "missing_database",
            Self::UserNotFound(_) => "user_not_found",
            Self::TagMissingName { .. } => "tag_missing_name",
            Self::Decode(_) => "decode_error",
            Self::Encode(_) => "encode_error",
            Self::Db(_) => "db_error",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
