use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Text given to migrated tasks that had none.
pub const PLACEHOLDER_TEXT: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Habit,
    Daily,
    Todo,
    Reward,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Habit => write!(f, "habit"),
            Self::Daily => write!(f, "daily"),
            Self::Todo => write!(f, "todo"),
            Self::Reward => write!(f, "reward"),
        }
    }
}

impl TaskKind {
    /// Key of this kind's list in the user's `tasksOrder`.
    pub fn order_key(self) -> &'static str {
        match self {
            Self::Habit => "habits",
            Self::Daily => "dailys",
            Self::Todo => "todos",
            Self::Reward => "rewards",
        }
    }

    /// Fields the new schema requires for this kind.
    pub fn defaults(self) -> Document {
        match self {
            Self::Habit => doc! {
                "up": true,
                "down": true,
                "history": [],
            },
            Self::Daily => doc! {
                "completed": false,
                "streak": 0,
                "checklist": [],
                "frequency": "weekly",
                "everyX": 1,
                "repeat": {
                    "m": true, "t": true, "w": true, "th": true,
                    "f": true, "s": true, "su": true,
                },
            },
            Self::Todo => doc! {
                "completed": false,
                "checklist": [],
            },
            Self::Reward => Document::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TasksOrder {
    pub habits: Vec<String>,
    pub dailys: Vec<String>,
    pub todos: Vec<String>,
    pub rewards: Vec<String>,
}

impl TasksOrder {
    pub fn get(&self, kind: TaskKind) -> &[String] {
        match kind {
            TaskKind::Habit => &self.habits,
            TaskKind::Daily => &self.dailys,
            TaskKind::Todo => &self.todos,
            TaskKind::Reward => &self.rewards,
        }
    }

    pub fn push(&mut self, kind: TaskKind, task_id: String) {
        let list = match kind {
            TaskKind::Habit => &mut self.habits,
            TaskKind::Daily => &mut self.dailys,
            TaskKind::Todo => &mut self.todos,
            TaskKind::Reward => &mut self.rewards,
        };
        list.push(task_id);
    }

    pub fn len(&self) -> usize {
        self.habits.len() + self.dailys.len() + self.todos.len() + self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<Bson>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub tasks_order: TasksOrder,
    pub tags: Vec<Tag>,
    pub challenges: Vec<Bson>,
    pub party: Document,
    pub invitations: Document,
    /// Legacy fields carried over unchanged.
    #[serde(flatten)]
    pub attrs: Document,
}

impl User {
    pub const RESERVED_FIELDS: &'static [&'static str] = &[
        "_id",
        "tasksOrder",
        "tags",
        "challenges",
        "party",
        "invitations",
    ];

    pub fn to_document(&self) -> Result<Document> {
        Ok(mongodb::bson::to_document(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub text: String,
    pub tags: Vec<String>,
    pub challenge: Document,
    /// Identifier the task had inside the legacy user document.
    pub legacy_id: String,
    #[serde(flatten)]
    pub attrs: Document,
}

impl Task {
    pub const RESERVED_FIELDS: &'static [&'static str] = &[
        "_id",
        "userId",
        "type",
        "text",
        "tags",
        "challenge",
        "legacyId",
    ];

    /// Build a task of `kind`, filling the kind's required fields that `attrs` lacks.
    pub fn new(
        kind: TaskKind,
        id: String,
        user_id: String,
        legacy_id: String,
        text: Option<String>,
        tags: Vec<String>,
        mut attrs: Document,
    ) -> Self {
        for key in Self::RESERVED_FIELDS {
            attrs.remove(*key);
        }
        for (key, value) in kind.defaults() {
            if !attrs.contains_key(&key) {
                attrs.insert(key, value);
            }
        }

        let text = text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string());

        Self {
            id,
            user_id,
            kind,
            text,
            tags,
            challenge: Document::new(),
            legacy_id,
            attrs,
        }
    }

    pub fn to_document(&self) -> Result<Document> {
        Ok(mongodb::bson::to_document(self)?)
    }
}
