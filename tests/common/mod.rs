//! Shared fixtures for the end-to-end tests
#![allow(dead_code)]

use anyhow::Result;
use neosync::fs_enum::FileEntry;
use neosync::inventory::RemoteListingEntry;
use neosync::transport::{ApiResponse, Listing, SiteInfo, Transport};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Info(Option<String>),
    List(Option<String>),
    Upload(Vec<(String, String)>),
    Delete(Vec<String>),
}

/// In-memory site that records every request it receives
#[derive(Default)]
pub struct RecordingTransport {
    pub calls: RefCell<Vec<Call>>,
    pub listing: Vec<RemoteListingEntry>,
    pub refuse_uploads: HashSet<String>,
    pub fail_list: bool,
}

impl RecordingTransport {
    pub fn with_listing(listing: Vec<RemoteListingEntry>) -> Self {
        Self {
            listing,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn uploaded_remote_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload(pairs) => Some(pairs.into_iter().map(|(_, r)| r)),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

pub fn error_body() -> Value {
    json!({"result": "error", "error_type": "invalid_file_type", "message": "nope"})
}

impl Transport for RecordingTransport {
    fn info(&self, site: Option<&str>) -> neosync::Result<ApiResponse<SiteInfo>> {
        self.calls.borrow_mut().push(Call::Info(site.map(String::from)));
        let mut info = SiteInfo::new();
        info.insert("sitename".into(), json!(site.unwrap_or("me")));
        Ok(ApiResponse::Success(info))
    }

    fn list_items(&self, site: Option<&str>) -> neosync::Result<ApiResponse<Listing>> {
        self.calls.borrow_mut().push(Call::List(site.map(String::from)));
        if self.fail_list {
            return Ok(ApiResponse::Failure(json!({"result": "error", "error_type": "invalid_auth"})));
        }
        Ok(ApiResponse::Success(Listing {
            files: self.listing.clone(),
        }))
    }

    fn upload(&self, files: &[FileEntry]) -> neosync::Result<ApiResponse<()>> {
        let pairs = files
            .iter()
            .map(|f| (f.local_path.display().to_string(), f.remote_path.clone()))
            .collect();
        self.calls.borrow_mut().push(Call::Upload(pairs));
        if files.iter().any(|f| self.refuse_uploads.contains(&f.remote_path)) {
            return Ok(ApiResponse::Failure(error_body()));
        }
        Ok(ApiResponse::Success(()))
    }

    fn delete(&self, paths: &[String]) -> neosync::Result<ApiResponse<()>> {
        self.calls.borrow_mut().push(Call::Delete(paths.to_vec()));
        Ok(ApiResponse::Success(()))
    }
}

pub fn write_file(root: &Path, rel: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rel.as_bytes())?;
    Ok(())
}

pub fn sample_site(root: &Path) -> Result<()> {
    for rel in ["index.html", "img/logo.png", "notes.txt", "data.bin"] {
        write_file(root, rel)?;
    }
    Ok(())
}
