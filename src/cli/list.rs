//! tenthousand list command implementation

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::TaskStore;

/// Options for `tenthousand list`
pub struct ListOptions {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ListReport {
    year: i32,
    goal: u64,
    tasks: Vec<TaskSummary>,
}

#[derive(serde::Serialize)]
struct TaskSummary {
    name: String,
    total: u64,
}

pub fn run(options: ListOptions) -> Result<()> {
    let config = super::resolve_config(options.config.as_deref())?;
    let store = TaskStore::for_config(&config);

    let mut tasks = Vec::new();
    for name in store.task_names()? {
        let total = store.load(&name)?.total()?;
        tasks.push(TaskSummary { name, total });
    }

    let mut human = HumanOutput::new(format!(
        "tenthousand list: {} task(s) in {}",
        tasks.len(),
        config.year
    ));
    for task in &tasks {
        human.push_detail(format!("{}: {}/{}", task.name, task.total, config.goal));
    }
    if tasks.is_empty() {
        human.push_next_step("tenthousand add <count> <task> --init-task");
    }

    let report = ListReport {
        year: config.year,
        goal: config.goal,
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &report,
        Some(&human),
    )?;

    Ok(())
}
