//! Rolling Logger
//!
//! File logging for the habit tracker: a size-rotated log file plus a ring
//! buffer of the most recent lines, installed as the global `tracing`
//! subscriber. `log` records are bridged into the same output.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Rotate once the active file would grow past this size
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;
/// Rotated files kept next to the active one (`.1` is the newest)
pub const MAX_BACKUPS: usize = 3;
/// Lines kept in memory for [`recent_logs`]
pub const RING_CAPACITY: usize = 500;

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct RollingFile {
    path: PathBuf,
    file: File,
    size: u64,
    max_bytes: u64,
    backups: usize,
}

impl RollingFile {
    fn open(path: PathBuf, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            file,
            size,
            max_bytes,
            backups,
        })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups == 0 {
            self.file = File::create(&self.path)?;
            self.size = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.size = 0;
        Ok(())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.size += buf.len() as u64;
        Ok(())
    }
}

struct Shared {
    file: Mutex<RollingFile>,
    recent: Mutex<VecDeque<String>>,
    capacity: usize,
}

/// Writer handed to the fmt layer; clones share one file and one buffer.
#[derive(Clone)]
pub struct RollingWriter {
    shared: Arc<Shared>,
}

impl RollingWriter {
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        Self::with_limits(path, MAX_FILE_BYTES, MAX_BACKUPS, RING_CAPACITY)
    }

    pub fn with_limits(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backups: usize,
        capacity: usize,
    ) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            shared: Arc::new(Shared {
                file: Mutex::new(RollingFile::open(path, max_bytes, backups)?),
                recent: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity,
            }),
        })
    }

    pub fn path(&self) -> PathBuf {
        lock(&self.shared.file).path.clone()
    }

    /// Most recent lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        lock(&self.shared.recent).iter().cloned().collect()
    }

    fn remember(&self, buf: &[u8]) {
        if self.shared.capacity == 0 {
            return;
        }
        let text = String::from_utf8_lossy(buf);
        let mut recent = lock(&self.shared.recent);
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            if recent.len() == self.shared.capacity {
                recent.pop_front();
            }
            recent.push_back(line.to_string());
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.shared.file).write_all(buf)?;
        self.remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.shared.file).file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`.
///
/// The level comes from `RUST_LOG`, `info` when unset.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    let path = log_dir.as_ref().join(format!("{}.log", app_name));
    let writer = RollingWriter::new(&path)
        .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_timer(LocalTimestamp)
                .with_writer(writer.clone()),
        )
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    LOGGER
        .set(writer)
        .map_err(|_| "Logger already initialized".to_string())?;

    tracing::info!(path = %path.display(), "logger initialized");
    Ok(())
}

/// Active log file of the installed logger
pub fn log_file_path() -> Option<PathBuf> {
    LOGGER.get().map(RollingWriter::path)
}

/// Lines logged by this process, oldest first
pub fn recent_logs() -> Vec<String> {
    LOGGER.get().map(RollingWriter::recent).unwrap_or_default()
}

/// Last `count` lines of a log file, oldest first
pub fn read_log_tail(path: impl AsRef<Path>, count: usize) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}

fn ensure_initialized() -> Result<(), String> {
    if LOGGER.get().is_some() {
        Ok(())
    } else {
        Err("Logger not initialized".to_string())
    }
}

pub fn info(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!("{}", message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_and_remembers_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::new(dir.path().join("logs").join("App.log")).unwrap();

        writer.write_all(b"first line\n").unwrap();
        writer.write_all(b"second\nthird\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.recent(), vec!["first line", "second", "third"]);
        let tail = read_log_tail(writer.path(), 2).unwrap();
        assert_eq!(tail, vec!["second", "third"]);
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer =
            RollingWriter::with_limits(dir.path().join("App.log"), MAX_FILE_BYTES, 1, 3).unwrap();

        for i in 0..5 {
            writer.write_all(format!("line {}\n", i).as_bytes()).unwrap();
        }
        assert_eq!(writer.recent(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_rotation_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App.log");
        let mut writer = RollingWriter::with_limits(&path, 16, 2, 10).unwrap();

        for i in 0..6 {
            // 11 bytes each, so every write after the first rotates
            writer.write_all(format!("entry-{:04}\n", i).as_bytes()).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "entry-0005\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("App.log.1")).unwrap(),
            "entry-0004\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("App.log.2")).unwrap(),
            "entry-0003\n"
        );
        assert!(!dir.path().join("App.log.3").exists());
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App.log");
        RollingWriter::new(&path).unwrap().write_all(b"one\n").unwrap();
        RollingWriter::new(&path).unwrap().write_all(b"two\n").unwrap();
        assert_eq!(read_log_tail(&path, 10).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_helpers_require_init() {
        if LOGGER.get().is_none() {
            assert!(info("not yet").is_err());
        }
    }
}
