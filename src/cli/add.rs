//! tenthousand add command implementation
//!
//! Appends one entry to a task, creating the task first when the user
//! asked for it (`--init-task`) or confirms the prompt.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::{plan_add, AddPlan, Entry, TaskStore};

/// Options for `tenthousand add`
pub struct AddOptions {
    pub count: u64,
    pub task: String,
    pub init_task: bool,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct AddReport {
    task: String,
    count: u64,
    timestamp: DateTime<Utc>,
    total: u64,
    created: bool,
    path: PathBuf,
}

/// Outcome of logging one entry
struct Recorded {
    entry: Entry,
    total: u64,
    created: bool,
}

pub fn run(options: AddOptions) -> Result<()> {
    let config = super::resolve_config(options.config.as_deref())?;
    let store = TaskStore::for_config(&config);
    let task = options.task;

    let Recorded {
        entry,
        total,
        created,
    } = record(&store, &task, options.count, options.init_task, confirm_create)?;
    let path = store.task_file(&task);

    let report = AddReport {
        task: task.clone(),
        count: entry.count,
        timestamp: entry.timestamp,
        total,
        created,
        path: path.clone(),
    };

    let mut human = HumanOutput::new(format!("tenthousand add: {} {task}", entry.count));
    human.push_summary("total", format!("{total}/{}", config.goal));
    human.push_summary("logged at", entry.timestamp.to_rfc3339());
    if created {
        human.push_detail(format!("created task file {}", path.display()));
    }
    human.push_next_step(format!("tenthousand progress {task}"));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &report,
        Some(&human),
    )?;

    Ok(())
}

/// Create the task if allowed, then append `count` to it
///
/// `confirm` is only consulted when the task is missing and `init_task` is
/// not set.
fn record(
    store: &TaskStore,
    task: &str,
    count: u64,
    init_task: bool,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<Recorded> {
    let created = match plan_add(store.exists(task)?, init_task) {
        AddPlan::Existing => false,
        AddPlan::CreateSilently => {
            store.create(task)?;
            true
        }
        AddPlan::NeedsConfirmation => {
            if !confirm(task)? {
                return Err(Error::TaskCreationDeclined(task.to_string()));
            }
            store.create(task)?;
            true
        }
    };

    let entry = store.append(task, count, Utc::now())?;
    let total = store.load(task)?.total()?;
    Ok(Recorded {
        entry,
        total,
        created,
    })
}

fn confirm_create(task: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Task '{task}' doesn't exist. Create it?"))
        .default(false)
        .interact()?;
    Ok(confirmed)
}
