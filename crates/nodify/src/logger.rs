//! File logger writing to `~/.nodify/logs/{run_id}/log`, mirrored to stderr.

use crate::config::nodify_dir;
use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

pub struct NodifyLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl NodifyLogger {
    /// Open a fresh log file for this run under `root`.
    ///
    /// The run id is the local start time followed by the first group of a
    /// random uuid, so concurrent runs never share a file.
    pub fn new(root: &Path, level: LevelFilter) -> Result<(Self, PathBuf)> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid_string = Uuid::new_v4().to_string();
        let uuid = uuid_string.split('-').next().unwrap_or("unknown");
        let run_id = format!("{timestamp}_{uuid}");

        let log_dir = root.join(&run_id);
        create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok((
            Self {
                level,
                file: Mutex::new(file),
            },
            log_path,
        ))
    }

    /// Install the logger for the process.
    pub fn init(level: LevelFilter) -> Result<()> {
        let root = nodify_dir()?.join("logs");
        let (logger, log_path) = Self::new(&root, level)?;

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("Log file: {}", log_path.display());
        Ok(())
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for NodifyLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Self::format(record);
        if let Ok(mut file) = self.file.lock() {
            // A failed log write must not take the editor down.
            let _ = writeln!(file, "{}", message);
            let _ = file.flush();
        }
        eprintln!("{}", message);
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
