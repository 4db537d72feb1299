//! Shapes of the documents stored by the legacy schema.
//!
//! Legacy users embed their tasks in four per-kind arrays. Only the fields the
//! migration rewrites are named here; everything else is captured in `rest`
//! and passed through to the new schema untouched.

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Deserializer};

use crate::model::TaskKind;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub habits: Vec<LegacyTask>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub dailys: Vec<LegacyTask>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub rewards: Vec<LegacyTask>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub todos: Vec<LegacyTask>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<LegacyTag>,
    #[serde(default)]
    pub challenges: Option<Bson>,
    #[serde(default)]
    pub party: Option<Bson>,
    #[serde(default)]
    pub invitations: Option<Document>,
    #[serde(flatten)]
    pub rest: Document,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyTag {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub challenge: Option<Bson>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyTask {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub text: Option<String>,
    /// Tag id -> "tag applies" flag.
    #[serde(default)]
    pub tags: Option<Document>,
    #[serde(default)]
    pub challenge: Option<Bson>,
    #[serde(flatten)]
    pub rest: Document,
}

impl LegacyUser {
    pub fn from_document(doc: Document) -> crate::error::Result<Self> {
        Ok(mongodb::bson::from_document(doc)?)
    }

    pub fn task_count(&self) -> usize {
        self.habits.len() + self.dailys.len() + self.rewards.len() + self.todos.len()
    }
}

impl LegacyTask {
    /// Tag ids whose flag is truthy, in stored key order.
    pub fn applied_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .flat_map(|tags| tags.iter())
            .filter(|(_, flag)| is_truthy(flag))
            .map(|(tag_id, _)| tag_id.clone())
            .collect()
    }
}

/// Truthiness as the legacy application evaluated stored flags.
pub fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Null | Bson::Undefined => false,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(d) => *d != 0.0 && !d.is_nan(),
        Bson::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
