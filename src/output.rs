use clap::ValueEnum;
use colored::Colorize;

use crate::commands::migrate::MigrationReport;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

pub fn print_report(report: &MigrationReport, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(report)?),
        Format::Pretty => {
            for line in pretty_lines(report) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn pretty_lines(report: &MigrationReport) -> Vec<String> {
    let status = if report.dry_run {
        "dry run".yellow().bold()
    } else {
        "migrated".green().bold()
    };
    let elapsed = report.finished_at - report.started_at;
    let t = &report.tasks;

    vec![
        format!("[{}] user {}", status, report.user_id.bold()),
        format!(
            "  tasks: {} habits, {} dailys, {} todos, {} rewards ({} total)",
            t.habits, t.dailys, t.todos, t.rewards, t.total
        ),
        format!("  inserted: {} task documents", report.tasks_inserted),
        format!("  took: {}ms", elapsed.num_milliseconds()),
    ]
}
