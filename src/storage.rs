//! Task storage for tenthousand
//!
//! Each task is an append-only CSV log inside the year directory:
//!
//! ```text
//! <root>/
//!   2026/                       # Taskstore for one tracked year
//!     pullups.csv               # header + one row per logged entry
//!     pullups.csv.lock          # advisory lock marker (left in place)
//!     meditation.csv
//! ```
//!
//! Files are never rewritten. Totals are recomputed from the full log on
//! every read, so the only row a crash can damage is the one being written.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock::{self, LockedFile, OpenMode};
use crate::suggest;

/// Extension of task log files
pub const TASK_EXTENSION: &str = "csv";

/// Column names written as the first row of every task file
pub const HEADER: [&str; 2] = ["timestamp", "count"];

/// One logged batch of repetitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

/// A task and every entry logged against it, in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Task {
    /// Sum of all entry counts
    ///
    /// Fails with `TotalOverflow` instead of wrapping past `u64::MAX`.
    pub fn total(&self) -> Result<u64> {
        sum_counts(&self.entries).ok_or_else(|| Error::TotalOverflow(self.name.clone()))
    }
}

fn sum_counts(entries: &[Entry]) -> Option<u64> {
    entries
        .iter()
        .try_fold(0u64, |total, entry| total.checked_add(entry.count))
}

/// What `add` must do before it can append to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPlan {
    /// Task exists; append directly
    Existing,
    /// Task is missing and creation was requested up front
    CreateSilently,
    /// Task is missing; someone has to confirm its creation
    NeedsConfirmation,
}

/// Decide how an `add` proceeds without doing any I/O
pub fn plan_add(exists: bool, init_task: bool) -> AddPlan {
    match (exists, init_task) {
        (true, _) => AddPlan::Existing,
        (false, true) => AddPlan::CreateSilently,
        (false, false) => AddPlan::NeedsConfirmation,
    }
}

/// Reject names that cannot double as a plain file name
pub fn validate_task_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.starts_with('.')
        || name
            .chars()
            .any(|ch| ch == '/' || ch == '\\' || ch == '\0' || ch.is_control());
    if invalid {
        return Err(Error::InvalidTaskName(name.to_string()));
    }
    Ok(())
}

/// Store for the task logs of one year
#[derive(Debug, Clone)]
pub struct TaskStore {
    dir: PathBuf,
}

impl TaskStore {
    /// Store rooted at an explicit year directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store for the year named by `config`
    pub fn for_config(config: &Config) -> Self {
        Self::new(config.store_dir())
    }

    /// Path to the year directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path to the log file of `name`
    pub fn task_file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{TASK_EXTENSION}"))
    }

    /// Whether the task's log file exists (no lock taken)
    pub fn exists(&self, name: &str) -> Result<bool> {
        validate_task_name(name)?;
        Ok(self.task_file(name).exists())
    }

    /// Create a task, or load it if it already exists
    ///
    /// Existence is settled while the lock is held, so two racing creators
    /// never truncate each other.
    pub fn create(&self, name: &str) -> Result<Task> {
        validate_task_name(name)?;
        let path = self.task_file(name);
        if path.exists() {
            return self.load(name);
        }

        fs::create_dir_all(&self.dir)?;
        let mut file = match lock::with_lock(&path, OpenMode::CreateNew) {
            Ok(file) => file,
            Err(Error::Io(err)) if err.kind() == io::ErrorKind::AlreadyExists => {
                debug!(task = name, "task created concurrently; loading");
                return self.load(name);
            }
            Err(err) => return Err(err),
        };

        write_header(&mut file)?;
        file.file().sync_all()?;
        drop(file);

        info!(task = name, path = %path.display(), "created task");
        Ok(Task {
            name: name.to_string(),
            entries: Vec::new(),
        })
    }

    /// Load every entry of a task
    pub fn load(&self, name: &str) -> Result<Task> {
        validate_task_name(name)?;
        let path = self.task_file(name);
        let mut file = self.open_existing(name, &path, OpenMode::Read)?;
        let content = file.read_all()?;
        drop(file);

        let entries = parse_entries(&path, &content)?;
        debug!(task = name, entries = entries.len(), "loaded task");
        Ok(Task {
            name: name.to_string(),
            entries,
        })
    }

    /// Append one entry to an existing task
    ///
    /// The log is checked under the lock first: an entry that would push the
    /// total past `u64::MAX` is refused with `TotalOverflow` and nothing is
    /// written.
    pub fn append(&self, name: &str, count: u64, timestamp: DateTime<Utc>) -> Result<Entry> {
        validate_task_name(name)?;
        let path = self.task_file(name);
        let entry = Entry { timestamp, count };

        let mut file = self.open_existing(name, &path, OpenMode::Append)?;
        let content = file.read_all()?;
        let existing = parse_entries(&path, &content)?;
        sum_counts(&existing)
            .and_then(|total| total.checked_add(count))
            .ok_or_else(|| Error::TotalOverflow(name.to_string()))?;

        let len = repair_torn_tail(&file, &path, &content)?;
        if len == 0 {
            write_header(&mut file)?;
        }

        // Single write so a crash can only ever tear this row
        let row = encode_entry(&entry)?;
        file.write_all(&row)?;
        file.file().sync_data()?;

        debug!(task = name, count, %timestamp, "appended entry");
        Ok(entry)
    }

    /// Names of every task in this year, sorted
    pub fn task_names(&self) -> Result<Vec<String>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names: Vec<String> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(TASK_EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            // Stray files such as `.pullups.csv` are not tasks
            .filter(|name| validate_task_name(name).is_ok())
            .collect();

        names.sort();
        Ok(names)
    }

    /// `TaskNotFound` for `name`, with suggestions drawn from this store
    pub fn not_found(&self, name: &str) -> Error {
        let known = self.task_names().unwrap_or_default();
        Error::TaskNotFound {
            name: name.to_string(),
            suggestions: suggest::suggest_tasks(name, &known),
        }
    }

    fn open_existing(&self, name: &str, path: &Path, mode: OpenMode) -> Result<LockedFile> {
        match lock::with_lock(path, mode) {
            Ok(file) => Ok(file),
            Err(Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Err(self.not_found(name))
            }
            Err(err) => Err(err),
        }
    }
}

fn write_header(file: &mut LockedFile) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| Error::Io(io::Error::other(err.to_string())))?;
    file.write_all(&bytes)?;
    Ok(())
}

fn encode_entry(entry: &Entry) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(entry)?;
    writer
        .into_inner()
        .map_err(|err| Error::Io(io::Error::other(err.to_string())))
}

/// Drop an unterminated final row left by a crash mid-append
///
/// `content` is the file as read under the held lock. Returns the file
/// length after repair.
fn repair_torn_tail(file: &LockedFile, path: &Path, content: &[u8]) -> Result<u64> {
    let len = content.len() as u64;
    if content.last().map_or(true, |byte| *byte == b'\n') {
        return Ok(len);
    }

    let keep = content
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map(|pos| pos as u64 + 1)
        .unwrap_or(0);
    warn!(
        path = %path.display(),
        dropped_bytes = len - keep,
        "truncating torn final row"
    );
    file.file().set_len(keep)?;
    Ok(keep)
}

fn parse_entries(path: &Path, content: &[u8]) -> Result<Vec<Entry>> {
    // No newline at all: the header itself was torn while the task was being
    // created. `append` truncates it and writes a fresh header.
    if !content.is_empty() && !content.contains(&b'\n') {
        warn!(path = %path.display(), "skipping torn header");
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    if !headers.is_empty() && headers.iter().ne(HEADER) {
        return Err(Error::MalformedTaskFile {
            path: path.to_path_buf(),
            line: 1,
            reason: format!("unexpected header '{}'", headers.iter().collect::<Vec<_>>().join(",")),
        });
    }

    let mut rows: Vec<_> = reader.deserialize::<Entry>().collect();

    // Every complete write ends in a newline; an unterminated last row is torn
    let terminated = content.last().map_or(true, |byte| *byte == b'\n');
    if !terminated && rows.pop().is_some() {
        warn!(path = %path.display(), "skipping torn final row");
    }

    let mut entries = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match row {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                let line = err.position().map(|pos| pos.line()).unwrap_or(idx as u64 + 2);
                return Err(Error::MalformedTaskFile {
                    path: path.to_path_buf(),
                    line,
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(entries)
}
