//! tenthousand progress command implementation

use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::progress::{Progress, Schedule};
use crate::storage::TaskStore;

/// Options for `tenthousand progress`
pub struct ProgressOptions {
    pub task: String,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ProgressReport {
    task: String,
    entries: usize,
    #[serde(flatten)]
    progress: Progress,
}

pub fn run(options: ProgressOptions) -> Result<()> {
    let config = super::resolve_config(options.config.as_deref())?;
    let store = TaskStore::for_config(&config);

    let task = store.load(&options.task)?;
    let progress = Progress::compute(task.total()?, config.goal, config.year, Utc::now())?;

    let mut human = HumanOutput::new(format!(
        "{}: {}/{} ({:.1}%)",
        task.name, progress.total, progress.goal, progress.percent
    ));
    human.push_summary("completed", format!("{}/{}", progress.total, progress.goal));
    human.push_summary("expected by today", progress.expected.to_string());
    human.push_summary("status", progress.schedule_phrase());
    human.push_summary("needed", progress.daily_needed_display());
    if progress.schedule == Schedule::Behind && progress.daily_needed.is_none() {
        human.push_warning(format!("{} is over; the goal was not reached", config.year));
    }

    let report = ProgressReport {
        task: task.name.clone(),
        entries: task.entries.len(),
        progress,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "progress",
        &report,
        Some(&human),
    )?;

    Ok(())
}
