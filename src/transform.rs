//! Legacy user -> new-schema user and tasks.
//!
//! The transform is pure: it consumes one decoded legacy user and returns the
//! documents to insert. Task ids are minted through a caller-supplied closure.

use mongodb::bson::{Bson, Document};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{MigrateError, Result};
use crate::legacy::{LegacyTag, LegacyUser};
use crate::model::{Tag, Task, TaskKind, TasksOrder, User};

#[derive(Debug, Clone, PartialEq)]
pub struct MigratedUser {
    pub user: User,
    /// In processing order: habits, dailys, rewards, todos.
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub habits: usize,
    pub dailys: usize,
    pub todos: usize,
    pub rewards: usize,
    pub total: usize,
}

impl MigratedUser {
    pub fn user_document(&self) -> Result<Document> {
        self.user.to_document()
    }

    pub fn task_documents(&self) -> Result<Vec<Document>> {
        self.tasks.iter().map(Task::to_document).collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let order = &self.user.tasks_order;
        TaskCounts {
            habits: order.get(TaskKind::Habit).len(),
            dailys: order.get(TaskKind::Daily).len(),
            todos: order.get(TaskKind::Todo).len(),
            rewards: order.get(TaskKind::Reward).len(),
            total: self.tasks.len(),
        }
    }
}

pub fn transform_user(legacy: LegacyUser) -> Result<MigratedUser> {
    transform_user_with(legacy, || Uuid::new_v4().to_string())
}

/// Same as [`transform_user`] with an injected task-id generator.
pub fn transform_user_with<F>(legacy: LegacyUser, mut next_task_id: F) -> Result<MigratedUser>
where
    F: FnMut() -> String,
{
    // challenges and party are dropped: challenge linkage was carried by the
    // challenges migration, which runs first.
    let LegacyUser {
        id: user_id,
        habits,
        dailys,
        rewards,
        todos,
        tags,
        invitations,
        rest,
        ..
    } = legacy;

    let tags = tags
        .into_iter()
        .map(|tag| migrate_tag(&user_id, tag))
        .collect::<Result<Vec<_>>>()?;

    let mut invitations = invitations.unwrap_or_default();
    invitations.insert("guilds", Bson::Array(Vec::new()));
    invitations.insert("party", Document::new());

    let mut attrs = rest;
    for key in User::RESERVED_FIELDS {
        attrs.remove(*key);
    }

    let mut user = User {
        id: user_id,
        tasks_order: TasksOrder::default(),
        tags,
        challenges: Vec::new(),
        party: Document::new(),
        invitations,
        attrs,
    };

    let legacy_tasks = habits.into_iter().chain(dailys).chain(rewards).chain(todos);
    let mut tasks = Vec::with_capacity(legacy_tasks.size_hint().0);
    for legacy_task in legacy_tasks {
        let applied_tags = legacy_task.applied_tags();
        let task = Task::new(
            legacy_task.kind,
            next_task_id(),
            user.id.clone(),
            legacy_task.id,
            legacy_task.text,
            applied_tags,
            legacy_task.rest,
        );
        user.tasks_order.push(task.kind, task.id.clone());
        tasks.push(task);
    }

    Ok(MigratedUser { user, tasks })
}

fn migrate_tag(user_id: &str, tag: LegacyTag) -> Result<Tag> {
    let name = match tag.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(MigrateError::TagMissingName {
                user: user_id.to_string(),
                tag: tag.id,
            });
        }
    };
    Ok(Tag {
        id: tag.id,
        name,
        challenge: tag.challenge,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    fn sequential_ids() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("task-{n}")
        }
    }

    fn legacy(doc: Document) -> LegacyUser {
        LegacyUser::from_document(doc).unwrap()
    }

    fn tasks_of(prefix: &str, kind: &str, count: usize) -> Vec<Document> {
        (0..count)
            .map(|i| doc! { "id": format!("{prefix}{i}"), "type": kind, "text": format!("{prefix} {i}") })
            .collect()
    }

    #[test]
    fn single_habit_user_migrates() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "habits": [{ "id": "h1", "type": "habit", "tags": { "t1": true } }],
                "dailys": [],
                "rewards": [],
                "todos": [],
                "tags": [{ "id": "t1", "name": "Health" }],
            }),
            sequential_ids(),
        )
        .unwrap();

        assert_eq!(migrated.user.id, "u1");
        assert_eq!(migrated.user.tasks_order.habits, vec!["task-1"]);
        assert_eq!(migrated.tasks.len(), 1);

        let task = &migrated.tasks[0];
        assert_eq!(task.id, "task-1");
        assert_eq!(task.legacy_id, "h1");
        assert_eq!(task.tags, vec!["t1"]);
        assert_eq!(task.user_id, "u1");
        assert_eq!(task.text, "text");

        let doc = task.to_document().unwrap();
        assert_eq!(doc.get_str("legacyId").unwrap(), "h1");
    }

    #[test]
    fn counts_partition_tasks_by_kind() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "habits": tasks_of("h", "habit", 3),
                "dailys": tasks_of("d", "daily", 2),
                "rewards": tasks_of("r", "reward", 1),
                "todos": tasks_of("t", "todo", 4),
            }),
            sequential_ids(),
        )
        .unwrap();

        assert_eq!(
            migrated.counts(),
            TaskCounts {
                habits: 3,
                dailys: 2,
                todos: 4,
                rewards: 1,
                total: 10,
            }
        );
        assert_eq!(migrated.task_documents().unwrap().len(), 10);
        assert!(migrated.tasks.iter().all(|t| t.user_id == "u1"));
    }

    #[test]
    fn tasks_follow_concatenation_order() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "todos": tasks_of("t", "todo", 1),
                "rewards": tasks_of("r", "reward", 1),
                "dailys": tasks_of("d", "daily", 2),
                "habits": tasks_of("h", "habit", 1),
            }),
            sequential_ids(),
        )
        .unwrap();

        let legacy_ids: Vec<_> = migrated.tasks.iter().map(|t| t.legacy_id.as_str()).collect();
        assert_eq!(legacy_ids, ["h0", "d0", "d1", "r0", "t0"]);
        assert_eq!(migrated.user.tasks_order.dailys, vec!["task-2", "task-3"]);
        assert_eq!(migrated.user.tasks_order.rewards, vec!["task-4"]);
        assert_eq!(migrated.user.tasks_order.todos, vec!["task-5"]);
    }

    #[test]
    fn task_type_decides_order_list() {
        // A daily stored in the habits array.
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "habits": [{ "id": "x", "type": "daily", "text": "misfiled" }],
            }),
            sequential_ids(),
        )
        .unwrap();

        assert!(migrated.user.tasks_order.habits.is_empty());
        assert_eq!(migrated.user.tasks_order.dailys, vec!["task-1"]);
        assert_eq!(migrated.tasks[0].kind, TaskKind::Daily);
    }

    #[test]
    fn tag_map_flattens_to_true_keys() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "todos": [{ "id": "t", "type": "todo", "tags": { "a": true, "b": false, "c": true } }],
            }),
            sequential_ids(),
        )
        .unwrap();

        let mut tags = migrated.tasks[0].tags.clone();
        tags.sort();
        assert_eq!(tags, ["a", "c"]);
    }

    #[test]
    fn challenge_party_and_invitations_are_reset() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "challenges": ["c1", "c2"],
                "party": { "_id": "p1", "order": "level" },
                "invitations": {
                    "guilds": [{ "id": "g1" }],
                    "party": { "id": "p2" },
                    "pending": true,
                },
                "rewards": [{ "id": "r", "type": "reward", "text": "x", "challenge": { "id": "c1" } }],
            }),
            sequential_ids(),
        )
        .unwrap();

        let doc = migrated.user_document().unwrap();
        assert!(doc.get_array("challenges").unwrap().is_empty());
        assert!(doc.get_document("party").unwrap().is_empty());
        let invitations = doc.get_document("invitations").unwrap();
        assert!(invitations.get_array("guilds").unwrap().is_empty());
        assert!(invitations.get_document("party").unwrap().is_empty());
        assert!(invitations.get_bool("pending").unwrap());
        assert!(migrated.tasks[0].challenge.is_empty());
    }

    #[test]
    fn missing_invitations_still_get_empty_structures() {
        let migrated = transform_user_with(legacy(doc! { "_id": "u1" }), sequential_ids()).unwrap();
        assert_eq!(
            migrated.user.invitations,
            doc! { "guilds": [], "party": {} }
        );
    }

    #[test]
    fn tags_keep_id_name_and_challenge() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "tags": [
                    { "id": "t1", "name": "Health", "challenge": "c1" },
                    { "id": "t2", "name": "Work" },
                ],
            }),
            sequential_ids(),
        )
        .unwrap();

        let doc = migrated.user_document().unwrap();
        let tags = doc.get_array("tags").unwrap();
        assert_eq!(
            tags[0],
            Bson::Document(doc! { "_id": "t1", "name": "Health", "challenge": "c1" })
        );
        assert_eq!(tags[1], Bson::Document(doc! { "_id": "t2", "name": "Work" }));
    }

    #[test]
    fn tag_without_name_is_rejected() {
        let err = transform_user_with(
            legacy(doc! { "_id": "u1", "tags": [{ "id": "t1" }] }),
            sequential_ids(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MigrateError::TagMissingName { ref user, ref tag } if user == "u1" && tag == "t1"
        ));
    }

    #[test]
    fn residual_fields_pass_through_and_task_arrays_do_not() {
        let migrated = transform_user_with(
            legacy(doc! {
                "_id": "u1",
                "profile": { "name": "Ada" },
                "preferences": { "dayStart": 4 },
                "tasksOrder": { "habits": ["stale"] },
                "habits": tasks_of("h", "habit", 1),
            }),
            sequential_ids(),
        )
        .unwrap();

        let doc = migrated.user_document().unwrap();
        assert_eq!(doc.get_document("profile").unwrap(), &doc! { "name": "Ada" });
        assert!(doc.contains_key("preferences"));
        for legacy_field in ["habits", "dailys", "rewards", "todos"] {
            assert!(!doc.contains_key(legacy_field), "{legacy_field} leaked");
        }
        let order = doc.get_document("tasksOrder").unwrap();
        assert_eq!(order.get_array("habits").unwrap(), &vec![Bson::String("task-1".into())]);
    }

    #[test]
    fn default_generator_mints_uuids() {
        let migrated = transform_user(legacy(doc! {
            "_id": "u1",
            "todos": tasks_of("t", "todo", 2),
        }))
        .unwrap();

        let ids: Vec<_> = migrated.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));
    }
}
