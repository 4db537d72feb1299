use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::build_info;
use crate::config::MigrationConfig;
use crate::error::Result;
use crate::output::{self, Format};
use crate::store::connect::Stores;
use crate::store::source::fetch_legacy_user;
use crate::store::writer::write_migrated;
use crate::store::{LegacyUsers, MigrationSink};
use crate::transform::{TaskCounts, transform_user};

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub user_id: String,
    pub dry_run: bool,
    pub tasks: TaskCounts,
    pub tasks_inserted: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub async fn run(config: &MigrationConfig, format: Format) -> Result<()> {
    info!("Starting users migration {}.", build_info::describe());

    let stores = Stores::connect(config).await?;
    info!(
        "Connected to source database {} and destination database {}.",
        stores.source.database_name(),
        stores.destination.database_name()
    );

    let report = migrate_user(
        &stores.source,
        &stores.destination,
        &config.user_id,
        config.dry_run,
    )
    .await?;

    output::print_report(&report, format)
}

/// Move one user: fetch, transform, then write unless `dry_run`.
pub async fn migrate_user<S, W>(
    source: &S,
    sink: &W,
    user_id: &str,
    dry_run: bool,
) -> Result<MigrationReport>
where
    S: LegacyUsers,
    W: MigrationSink,
{
    let started_at = Utc::now();

    let legacy = fetch_legacy_user(source, user_id).await?;
    debug!(user_id, legacy_tasks = legacy.task_count(), "fetched legacy user");

    let migrated = transform_user(legacy)?;
    for task in &migrated.tasks {
        debug!(
            legacy_id = %task.legacy_id,
            task_id = %task.id,
            list = task.kind.order_key(),
            "mapped task"
        );
    }
    let tasks = migrated.counts();

    let tasks_inserted = if dry_run {
        info!(
            "Dry run: would save user {} and {} tasks.",
            migrated.user.id, tasks.total
        );
        0
    } else {
        let summary = write_migrated(sink, &migrated).await?;
        info!("Saved user {} and their tasks.", summary.user_id);
        summary.tasks_inserted
    };

    Ok(MigrationReport {
        user_id: migrated.user.id,
        dry_run,
        tasks,
        tasks_inserted,
        started_at,
        finished_at: Utc::now(),
    })
}
