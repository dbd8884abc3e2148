use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, SyncError};
use crate::path_map::{map_path, relative_remote_path, stays_under_cwd};
// Local tree enumeration for push and upload-root

/// A local file paired with the remote name it will be uploaded under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub local_path: PathBuf,
    pub remote_path: String,
}

impl FileEntry {
    pub fn new(local_path: impl Into<PathBuf>, remote_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_path: remote_path.into(),
        }
    }
}

/// How remote names are derived from walked paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteNaming {
    /// Relative to the walked directory (push)
    RelativeTo,
    /// The walked path itself, minus a leading `./` (upload-root). A root
    /// that is absolute or climbs out with `..` names files relative to
    /// itself instead, so remote names stay relative.
    Rooted,
}

/// Lazy, one-shot walk over the regular files below a directory.
///
/// Symlinks to files are yielded under the link's name; symlinked
/// directories are not descended into.
///
/// Within each directory files come first, then subdirectories, both in
/// file-name order, so a static tree always yields the same sequence.
pub struct Walk {
    root: PathBuf,
    naming: RemoteNaming,
    inner: walkdir::IntoIter,
}

pub fn walk(directory: &Path, naming: RemoteNaming) -> Walk {
    let inner = WalkDir::new(directory)
        .follow_links(false)
        .sort_by(files_before_dirs)
        .into_iter();
    Walk {
        root: directory.to_path_buf(),
        naming,
        inner,
    }
}

fn files_before_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

impl Walk {
    fn entry_for(&self, path: &Path) -> FileEntry {
        let remote_path = match self.naming {
            RemoteNaming::Rooted if stays_under_cwd(&self.root) => map_path(&self.root, path),
            _ => {
                let rel = relative_remote_path(&self.root, path);
                if rel.is_empty() {
                    // The walk root was itself a file
                    path.file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default()
                } else {
                    rel
                }
            }
        };
        FileEntry::new(path, remote_path)
    }
}

impl Iterator for Walk {
    type Item = Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(e) => return Some(Err(SyncError::from(e))),
            };
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file {
                return Some(Ok(self.entry_for(entry.path())));
            }
        }
    }
}
