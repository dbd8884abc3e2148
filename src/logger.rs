use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Result, SyncError};

/// Event sink for sync operations. Every hook defaults to a no-op.
pub trait Logger: Send + Sync {
    fn start(&self, _operation: &str, _target: &str) {}
    fn upload_done(&self, _local: &Path, _remote: &str) {}
    fn skipped(&self, _local: &Path) {}
    fn delete(&self, _remote: &str) {}
    fn error(&self, _context: &str, _target: &str, _msg: &str) {}
    fn done(&self, _operation: &str, _files: u64, _failed: u64, _seconds: f64) {}
}

pub struct NoopLogger;
impl Logger for NoopLogger {}

pub struct TextLogger {
    file: Mutex<File>,
}

impl TextLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SyncError::filesystem(path, e))?;
        Ok(Self {
            file: Mutex::new(f),
        })
    }

    fn line(&self, s: &str) {
        if let Ok(mut f) = self.file.lock() {
            let _ = writeln!(f, "[{}] {}", Utc::now().to_rfc3339(), s);
        }
    }
}

impl Logger for TextLogger {
    fn start(&self, operation: &str, target: &str) {
        self.line(&format!("START op={operation} target={target}"));
    }
    fn upload_done(&self, local: &Path, remote: &str) {
        self.line(&format!("UPLOAD src={} dst={}", local.display(), remote));
    }
    fn skipped(&self, local: &Path) {
        self.line(&format!("SKIP src={}", local.display()));
    }
    fn delete(&self, remote: &str) {
        self.line(&format!("DELETE path={remote}"));
    }
    fn error(&self, context: &str, target: &str, msg: &str) {
        self.line(&format!("ERROR ctx={context} target={target} msg={msg}"));
    }
    fn done(&self, operation: &str, files: u64, failed: u64, seconds: f64) {
        self.line(&format!(
            "DONE op={operation} files={files} failed={failed} seconds={seconds:.3}"
        ));
    }
}

/// Fan events out to several sinks (e.g. log file plus console progress)
#[derive(Default)]
pub struct MultiLogger {
    sinks: Vec<Box<dyn Logger>>,
}

impl MultiLogger {
    pub fn push(&mut self, sink: Box<dyn Logger>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Logger for MultiLogger {
    fn start(&self, operation: &str, target: &str) {
        self.sinks.iter().for_each(|s| s.start(operation, target));
    }
    fn upload_done(&self, local: &Path, remote: &str) {
        self.sinks.iter().for_each(|s| s.upload_done(local, remote));
    }
    fn skipped(&self, local: &Path) {
        self.sinks.iter().for_each(|s| s.skipped(local));
    }
    fn delete(&self, remote: &str) {
        self.sinks.iter().for_each(|s| s.delete(remote));
    }
    fn error(&self, context: &str, target: &str, msg: &str) {
        self.sinks.iter().for_each(|s| s.error(context, target, msg));
    }
    fn done(&self, operation: &str, files: u64, failed: u64, seconds: f64) {
        self.sinks
            .iter()
            .for_each(|s| s.done(operation, files, failed, seconds));
    }
}
