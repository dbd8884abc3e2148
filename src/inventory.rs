//! Remote listing snapshot and the keep/delete split used by `delete-all`

use serde::{Deserialize, Serialize};

/// Remote path that `delete-all` never removes
pub const KEEP_PATH: &str = "index.html";

/// One row of `/api/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteListingEntry {
    pub path: String,
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1_hash: Option<String>,
}

impl RemoteListingEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, false)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, true)
    }

    fn new(path: impl Into<String>, is_directory: bool) -> Self {
        Self {
            path: path.into(),
            is_directory,
            size: None,
            updated_at: None,
            sha1_hash: None,
        }
    }
}

/// Partition of a listing; every entry lands in exactly one vector
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    pub keep: Vec<String>,
    pub delete_files: Vec<String>,
    pub delete_dirs: Vec<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.delete_files.is_empty() && self.delete_dirs.is_empty()
    }
}

/// Split a listing into what stays and what goes, preserving input order
pub fn classify(listing: &[RemoteListingEntry]) -> Classification {
    let mut out = Classification::default();
    for entry in listing {
        if entry.path == KEEP_PATH {
            out.keep.push(entry.path.clone());
        } else if entry.is_directory {
            out.delete_dirs.push(entry.path.clone());
        } else {
            out.delete_files.push(entry.path.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_index_and_splits_the_rest() {
        let listing = vec![
            RemoteListingEntry::file("index.html"),
            RemoteListingEntry::file("about.html"),
            RemoteListingEntry::dir("img"),
        ];
        let c = classify(&listing);
        assert_eq!(c.keep, vec!["index.html"]);
        assert_eq!(c.delete_files, vec!["about.html"]);
        assert_eq!(c.delete_dirs, vec!["img"]);
    }

    #[test]
    fn index_kept_even_when_flagged_directory() {
        let c = classify(&[RemoteListingEntry::dir("index.html")]);
        assert_eq!(c.keep, vec!["index.html"]);
        assert!(c.is_empty());
    }

    #[test]
    fn nested_index_is_not_special() {
        let c = classify(&[RemoteListingEntry::file("blog/index.html")]);
        assert!(c.keep.is_empty());
        assert_eq!(c.delete_files, vec!["blog/index.html"]);
    }

    #[test]
    fn every_entry_lands_once_in_input_order() {
        let listing = vec![
            RemoteListingEntry::dir("b"),
            RemoteListingEntry::file("z.css"),
            RemoteListingEntry::dir("a"),
            RemoteListingEntry::file("index.html"),
            RemoteListingEntry::file("a/x.png"),
            RemoteListingEntry::dir("b/c"),
        ];
        let c = classify(&listing);
        assert_eq!(c.delete_dirs, vec!["b", "a", "b/c"]);
        assert_eq!(c.delete_files, vec!["z.css", "a/x.png"]);
        assert_eq!(
            c.keep.len() + c.delete_files.len() + c.delete_dirs.len(),
            listing.len()
        );
    }

    #[test]
    fn parses_api_rows_with_extra_metadata() {
        let row: RemoteListingEntry = serde_json::from_str(
            r#"{"path":"img","is_directory":true,"updated_at":"Sat, 13 Feb 2016 03:04:00 -0000"}"#,
        )
        .unwrap();
        assert!(row.is_directory);
        assert_eq!(row.size, None);

        let row: RemoteListingEntry = serde_json::from_str(
            r#"{"path":"index.html","is_directory":false,"size":1023,"sha1_hash":"c8aac06f","unknown":1}"#,
        )
        .unwrap();
        assert_eq!(row.size, Some(1023));
        assert_eq!(row.sha1_hash.as_deref(), Some("c8aac06f"));
    }
}
