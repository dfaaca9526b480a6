//! Advisory file locking for task logs
//!
//! Every task file `<name>.csv` is guarded by a companion marker
//! `<name>.csv.lock`. Writers and readers take the same exclusive lock on the
//! marker (fs2/flock) before opening the task file, and release it when the
//! guard is dropped.
//!
//! - Blocking acquisition with no timeout
//! - Guaranteed release on every exit path (RAII)
//! - Marker files are created on demand and left in place
//! - Atomic write helper (write temp + rename) for whole-file rewrites

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Error, Result};

/// Suffix appended to a guarded file's path to form its lock marker
pub const LOCK_SUFFIX: &str = ".lock";

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2/libc can surface lock/sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// Path of the lock marker guarding `path`
pub fn lock_path_for(path: impl AsRef<Path>) -> PathBuf {
    let mut raw = path.as_ref().as_os_str().to_os_string();
    raw.push(LOCK_SUFFIX);
    PathBuf::from(raw)
}

fn open_marker(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    Ok(file)
}

/// A file lock guard that releases the lock when dropped
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire an exclusive lock, waiting as long as it takes
    ///
    /// The marker file (and its parent directory) is created if missing.
    pub fn acquire_blocking(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = open_marker(path)?;

        debug!(lock = %path.display(), "waiting for exclusive lock");
        file.lock_exclusive()?;
        debug!(lock = %path.display(), "lock acquired");

        Ok(FileLock {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Try to acquire a lock without waiting
    ///
    /// Returns `Ok(Some(lock))` if acquired, `Ok(None)` if would block,
    /// or `Err` for other errors.
    pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = open_marker(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FileLock {
                file,
                path: path.to_path_buf(),
            })),
            Err(e) if is_lock_contended(&e) => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Get the path to the lock marker
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock the file - ignore errors during drop
        let _ = self.file.unlock();
        debug!(lock = %self.path.display(), "lock released");
    }
}

/// How the guarded file is opened once the lock is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-only; the file must exist
    Read,
    /// Read + append; the file must exist
    Append,
    /// Create the file; fails with `AlreadyExists` if it is present
    CreateNew,
}

impl OpenMode {
    fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => {
                options.read(true);
            }
            OpenMode::Append => {
                options.read(true).append(true);
            }
            OpenMode::CreateNew => {
                options.read(true).write(true).create_new(true);
            }
        }
        options
    }
}

/// An open file whose lock marker is held for the guard's lifetime
///
/// Fields drop in declaration order: the file handle closes before the lock
/// is released.
pub struct LockedFile {
    file: File,
    lock: FileLock,
}

impl LockedFile {
    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn lock(&self) -> &FileLock {
        &self.lock
    }

    /// Read the whole file from the start
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        self.file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for LockedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for LockedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Lock `<path>.lock`, then open `path` in `mode`
///
/// If opening fails the lock is released before the error is returned.
pub fn with_lock(path: impl AsRef<Path>, mode: OpenMode) -> Result<LockedFile> {
    let path = path.as_ref();
    let lock = FileLock::acquire_blocking(lock_path_for(path))?;
    let file = mode.options().open(path)?;
    Ok(LockedFile { file, lock })
}

/// Atomically write data to a file
///
/// This writes to a temporary file in the same directory, then renames
/// it to the target path. The file is either fully written or not
/// modified at all. No lock is taken.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn lock_path_appends_suffix() {
        let path = Path::new("/tmp/store/2026/pullups.csv");
        assert_eq!(
            lock_path_for(path),
            PathBuf::from("/tmp/store/2026/pullups.csv.lock")
        );
    }

    #[test]
    fn test_file_lock_acquire_release() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("test.lock");

        let lock = FileLock::acquire_blocking(&lock_path).unwrap();
        assert!(lock_path.exists());

        let result = FileLock::try_acquire(&lock_path).unwrap();
        assert!(result.is_none());

        drop(lock);

        let lock2 = FileLock::try_acquire(&lock_path).unwrap();
        assert!(lock2.is_some());
    }

    #[test]
    fn with_lock_holds_marker_until_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pushups.csv");
        fs::write(&path, "timestamp,count\n").unwrap();

        let guard = with_lock(&path, OpenMode::Append).unwrap();
        assert_eq!(guard.lock().path(), lock_path_for(&path).as_path());
        assert!(FileLock::try_acquire(lock_path_for(&path)).unwrap().is_none());

        drop(guard);
        assert!(FileLock::try_acquire(lock_path_for(&path)).unwrap().is_some());
        assert!(lock_path_for(&path).exists());
    }

    #[test]
    fn with_lock_releases_when_open_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");

        let err = with_lock(&path, OpenMode::Append).err().unwrap();
        match err {
            Error::Io(io) => assert_eq!(io.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(FileLock::try_acquire(lock_path_for(&path)).unwrap().is_some());
    }

    #[test]
    fn create_new_refuses_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plank.csv");
        fs::write(&path, "timestamp,count\n").unwrap();

        let err = with_lock(&path, OpenMode::CreateNew).err().unwrap();
        match err {
            Error::Io(io) => assert_eq!(io.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "timestamp,count\n");
    }

    #[test]
    fn append_mode_writes_at_end() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("squats.csv");
        fs::write(&path, "a\n").unwrap();

        {
            let mut guard = with_lock(&path, OpenMode::Append).unwrap();
            guard.write_all(b"b\n").unwrap();
            assert_eq!(guard.read_all().unwrap(), b"a\nb\n");
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");

        write_atomic(&file_path, b"year = 2026\n").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "year = 2026\n");

        write_atomic(&file_path, b"year = 2027\n").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "year = 2027\n");
    }

    #[test]
    fn stress_single_lock_holder() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stress.csv");
        fs::write(&path, "").unwrap();

        let threads = 12;
        let barrier = Arc::new(Barrier::new(threads));
        let in_lock = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));
        let acquired = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let barrier = Arc::clone(&barrier);
            let in_lock = Arc::clone(&in_lock);
            let max_concurrent = Arc::clone(&max_concurrent);
            let acquired = Arc::clone(&acquired);
            let path = path.clone();

            handles.push(thread::spawn(move || {
                barrier.wait();
                let _guard = with_lock(&path, OpenMode::Append).unwrap();

                let current = in_lock.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = max_concurrent.fetch_max(current, Ordering::SeqCst);

                thread::sleep(Duration::from_millis(10));

                in_lock.fetch_sub(1, Ordering::SeqCst);
                acquired.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(acquired.load(Ordering::SeqCst), threads);
        assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
    }
}
