//! Remote API contract
//!
//! The orchestrator only talks to a [`Transport`]. Every call returns a
//! tagged [`ApiResponse`]: either the typed payload, or the raw body when the
//! remote answered without the key we were looking for. `Err` is reserved for
//! failures below the API (connection, local read, undecodable body).

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, SyncError};
use crate::fs_enum::FileEntry;
use crate::inventory::RemoteListingEntry;

/// Key/value metadata from `/api/info`, in the order the server sent it
pub type SiteInfo = Map<String, Value>;

/// Payload of `/api/list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Listing {
    pub files: Vec<RemoteListingEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(Value),
}

impl<T> ApiResponse<T> {
    /// Turn a failure into `RemoteProtocol`, carrying the raw body
    pub fn into_result(self, operation: &'static str) -> Result<T> {
        match self {
            Self::Success(v) => Ok(v),
            Self::Failure(raw) => Err(SyncError::RemoteProtocol { operation, raw }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

pub trait Transport {
    fn info(&self, site: Option<&str>) -> Result<ApiResponse<SiteInfo>>;
    fn list_items(&self, site: Option<&str>) -> Result<ApiResponse<Listing>>;
    /// Upload every pair in one request
    fn upload(&self, files: &[FileEntry]) -> Result<ApiResponse<()>>;
    /// Delete every path in one request
    fn delete(&self, paths: &[String]) -> Result<ApiResponse<()>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn info(&self, site: Option<&str>) -> Result<ApiResponse<SiteInfo>> {
        (**self).info(site)
    }
    fn list_items(&self, site: Option<&str>) -> Result<ApiResponse<Listing>> {
        (**self).list_items(site)
    }
    fn upload(&self, files: &[FileEntry]) -> Result<ApiResponse<()>> {
        (**self).upload(files)
    }
    fn delete(&self, paths: &[String]) -> Result<ApiResponse<()>> {
        (**self).delete(paths)
    }
}

fn is_success(body: &Value) -> bool {
    body.get("result").and_then(Value::as_str) == Some("success")
}

/// `{"result":"success","info":{...}}`
pub fn parse_info(body: Value) -> ApiResponse<SiteInfo> {
    if !is_success(&body) {
        return ApiResponse::Failure(body);
    }
    match body.get("info") {
        Some(Value::Object(info)) => ApiResponse::Success(info.clone()),
        _ => ApiResponse::Failure(body),
    }
}

/// `{"result":"success","files":[...]}`
pub fn parse_listing(body: Value) -> ApiResponse<Listing> {
    if !is_success(&body) || body.get("files").is_none() {
        return ApiResponse::Failure(body);
    }
    match Listing::deserialize(&body) {
        Ok(listing) => ApiResponse::Success(listing),
        Err(_) => ApiResponse::Failure(body),
    }
}

/// Upload and delete only acknowledge with `result`
pub fn parse_ack(body: Value) -> ApiResponse<()> {
    if is_success(&body) {
        ApiResponse::Success(())
    } else {
        ApiResponse::Failure(body)
    }
}

/// Strip one trailing `.neocities.org` so `foo.neocities.org` and `foo` name the same site
pub fn normalize_site(site: &str) -> &str {
    site.strip_suffix(".neocities.org").unwrap_or(site)
}
