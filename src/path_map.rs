//! Local path -> remote path mapping
//!
//! Remote paths are always relative, `/`-separated and never start with `./`.

use std::path::{Component, Path};

/// Map a walked path onto its remote name.
///
/// `_root` is the directory the walk started from; the walked path already
/// carries it, so only a single leading `./` and platform separators change.
pub fn map_path(_root: &Path, walked: &Path) -> String {
    let s = normalize_separators(&walked.to_string_lossy());
    match s.strip_prefix("./") {
        Some(rest) => rest.to_string(),
        None => s,
    }
}

/// Remote name of `path` relative to `dir` (push semantics)
pub fn relative_remote_path(dir: &Path, path: &Path) -> String {
    match path.strip_prefix(dir) {
        Ok(rel) => map_path(dir, rel),
        Err(_) => map_path(dir, path),
    }
}

/// True when `path` names something below the working directory: relative
/// and free of `..` parts. Only such paths can double as remote names.
pub fn stays_under_cwd(path: &Path) -> bool {
    !path.has_root()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn normalize_separators(s: &str) -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        s.to_string()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
