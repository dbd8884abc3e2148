//! Sync orchestration: push, upload, upload-root, delete-all and friends
//!
//! Each operation is a single linear pipeline over a [`Transport`]. Nothing
//! is carried between calls.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{Result, SyncError};
use crate::ext_filter::is_supported;
use crate::fs_enum::{walk, FileEntry, RemoteNaming};
use crate::inventory::{classify, Classification};
use crate::logger::Logger;
use crate::path_map::{map_path, stays_under_cwd};
use crate::transport::{normalize_site, ApiResponse, Listing, SiteInfo, Transport};

/// Outcome of an operation that completed (possibly with per-file failures)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncReport {
    pub uploaded: Vec<String>,
    pub skipped: Vec<PathBuf>,
    pub deleted: Vec<String>,
    /// Remote path and the raw response for uploads the server refused
    pub failures: Vec<(String, Value)>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SiteSync<'a, T: Transport> {
    transport: T,
    logger: &'a dyn Logger,
}

impl<'a, T: Transport> SiteSync<'a, T> {
    pub fn new(transport: T, logger: &'a dyn Logger) -> Self {
        Self { transport, logger }
    }

    /// Recursively upload every publishable file below `directory`, one
    /// request per file. A refused file is recorded and the push goes on;
    /// filesystem and transport errors abort.
    pub fn push(&self, directory: &Path) -> Result<SyncReport> {
        let start = Instant::now();
        self.logger.start("push", &directory.display().to_string());
        let mut report = SyncReport::default();

        for entry in walk(directory, RemoteNaming::RelativeTo) {
            let entry = entry?;
            if !is_supported(&entry.local_path) {
                self.logger.skipped(&entry.local_path);
                report.skipped.push(entry.local_path);
                continue;
            }
            match self.transport.upload(std::slice::from_ref(&entry))? {
                ApiResponse::Success(()) => {
                    self.logger.upload_done(&entry.local_path, &entry.remote_path);
                    report.uploaded.push(entry.remote_path);
                }
                ApiResponse::Failure(raw) => {
                    self.logger
                        .error("upload", &entry.remote_path, &raw.to_string());
                    report.failures.push((entry.remote_path, raw));
                }
            }
        }

        self.logger.done(
            "push",
            report.uploaded.len() as u64,
            report.failures.len() as u64,
            start.elapsed().as_secs_f64(),
        );
        Ok(report)
    }

    /// Upload one file. `destination` must look like a file name (contain a
    /// `.`); without it the source path is reused as the remote name, or just
    /// its file name when the path leaves the working directory.
    pub fn upload(&self, source: &Path, destination: Option<&str>) -> Result<SyncReport> {
        let remote = resolve_destination(source, destination)?;
        let meta = std::fs::metadata(source).map_err(|e| SyncError::filesystem(source, e))?;
        if meta.is_dir() {
            return Err(SyncError::Validation(format!(
                "{} is a directory; use push or upload-root",
                source.display()
            )));
        }

        let start = Instant::now();
        self.logger.start("upload", &remote);
        let entry = FileEntry::new(source, remote);
        if let ApiResponse::Failure(raw) = self.transport.upload(std::slice::from_ref(&entry))? {
            self.logger.error("upload", &entry.remote_path, &raw.to_string());
            return Err(SyncError::RemoteProtocol {
                operation: "upload",
                raw,
            });
        }
        self.logger.upload_done(&entry.local_path, &entry.remote_path);
        self.logger.done("upload", 1, 0, start.elapsed().as_secs_f64());
        Ok(SyncReport {
            uploaded: vec![entry.remote_path],
            ..Default::default()
        })
    }

    /// Mirror a whole tree verbatim in one batched request, no filtering.
    /// Remote names are the walked paths with any leading `./` removed; a
    /// directory given as an absolute path or through `..` names its files
    /// relative to itself.
    pub fn upload_root(&self, directory: Option<&Path>) -> Result<SyncReport> {
        let directory = directory.unwrap_or_else(|| Path::new("."));
        let start = Instant::now();
        self.logger.start("upload-root", &directory.display().to_string());

        let files: Vec<FileEntry> = walk(directory, RemoteNaming::Rooted).collect::<Result<_>>()?;
        if files.is_empty() {
            self.logger.done("upload-root", 0, 0, start.elapsed().as_secs_f64());
            return Ok(SyncReport::default());
        }

        if let ApiResponse::Failure(raw) = self.transport.upload(&files)? {
            self.logger
                .error("upload-root", &directory.display().to_string(), &raw.to_string());
            return Err(SyncError::RemoteProtocol {
                operation: "upload-root",
                raw,
            });
        }
        for f in &files {
            self.logger.upload_done(&f.local_path, &f.remote_path);
        }
        self.logger.done(
            "upload-root",
            files.len() as u64,
            0,
            start.elapsed().as_secs_f64(),
        );
        Ok(SyncReport {
            uploaded: files.into_iter().map(|f| f.remote_path).collect(),
            ..Default::default()
        })
    }

    /// Delete everything on the site except `index.html`: files first, then
    /// directories, each as one batched request.
    pub fn delete_all(&self) -> Result<SyncReport> {
        let start = Instant::now();
        self.logger.start("delete-all", "/");
        let listing = self.transport.list_items(None)?.into_result("list")?;
        let Classification {
            delete_files,
            delete_dirs,
            ..
        } = classify(&listing.files);

        let mut report = SyncReport::default();
        for batch in [delete_files, delete_dirs] {
            self.delete_batch("delete-all", batch, &mut report)?;
        }
        self.logger.done(
            "delete-all",
            report.deleted.len() as u64,
            0,
            start.elapsed().as_secs_f64(),
        );
        Ok(report)
    }

    /// Delete the named remote paths in one request
    pub fn delete(&self, paths: &[String]) -> Result<SyncReport> {
        if paths.is_empty() {
            return Err(SyncError::Validation("no files given to delete".into()));
        }
        let start = Instant::now();
        self.logger.start("delete", &paths.join(" "));
        let mut report = SyncReport::default();
        self.delete_batch("delete", paths.to_vec(), &mut report)?;
        self.logger.done(
            "delete",
            report.deleted.len() as u64,
            0,
            start.elapsed().as_secs_f64(),
        );
        Ok(report)
    }

    fn delete_batch(
        &self,
        operation: &'static str,
        paths: Vec<String>,
        report: &mut SyncReport,
    ) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        if let ApiResponse::Failure(raw) = self.transport.delete(&paths)? {
            self.logger.error(operation, &paths.join(" "), &raw.to_string());
            return Err(SyncError::RemoteProtocol { operation, raw });
        }
        for p in &paths {
            self.logger.delete(p);
        }
        report.deleted.extend(paths);
        Ok(())
    }

    /// Site metadata; `site` may be given as `name` or `name.neocities.org`
    pub fn info(&self, site: Option<&str>) -> Result<SiteInfo> {
        self.transport
            .info(site.map(normalize_site))?
            .into_result("info")
    }

    pub fn list(&self, site: Option<&str>) -> Result<Listing> {
        self.transport
            .list_items(site.map(normalize_site))?
            .into_result("list")
    }
}

/// Validate a user-supplied destination or fall back to the source path.
///
/// An empty destination counts as none. A source that is absolute or climbs
/// out with `..` is uploaded under its file name alone.
pub fn resolve_destination(source: &Path, destination: Option<&str>) -> Result<String> {
    match destination.filter(|d| !d.is_empty()) {
        Some(dest) if !dest.contains('.') => Err(SyncError::Validation(
            "Invalid target; specify a target path file extension.".into(),
        )),
        Some(dest) => Ok(dest.to_string()),
        None if stays_under_cwd(source) => Ok(map_path(Path::new("."), source)),
        None => source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SyncError::Validation(format!("cannot name {} remotely", source.display()))
            }),
    }
}
