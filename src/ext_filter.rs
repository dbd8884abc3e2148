//! Publishable file types
//!
//! Free Neocities accounts only accept a fixed set of extensions.

use std::path::Path;

/// Allowed extensions, lowercase and dot-prefixed
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".jpg", ".png", ".gif", ".svg", ".ico", ".md", ".markdown", ".js", ".json",
    ".geojson", ".css", ".txt", ".text", ".csv", ".tsv", ".xml", ".eot", ".ttf", ".woff",
    ".woff2", ".mid", ".midi",
];

/// Check whether `path` has an allowed extension (case-insensitive)
pub fn is_supported(path: &Path) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = format!(".{}", ext.to_string_lossy().to_lowercase());
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}
