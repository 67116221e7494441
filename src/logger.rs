//! File sink for the `log` facade. The terminal belongs to the UI, so log
//! lines go to a file instead of stderr.

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
}

struct FileLogger;

static LOGGER: FileLogger = FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
        {
            let _ = writeln!(
                file,
                "[{}] {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock()
            && let Some(file) = guard.as_mut()
        {
            let _ = file.flush();
        }
    }
}

/// Opens (appending) the log file and installs the logger. Calling it again
/// swaps the file and level.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }
    // Already installed on a repeat call.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.log");
        init(&path, LevelFilter::Debug).unwrap();

        log::info!("Test log message");
        log::logger().flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO"));
        assert!(contents.contains("Test log message"));
    }

    #[test]
    fn test_init_fails_for_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing").join("test.log");
        assert!(init(&path, LevelFilter::Info).is_err());
    }
}
