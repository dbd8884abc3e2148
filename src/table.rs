//! Plain-text tables for `info` and `list`

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::inventory::RemoteListingEntry;
use crate::transport::SiteInfo;

/// Render rows as space-separated, left-aligned columns with a dashed rule
/// under the header (or above and below the body when there is no header).
pub fn render(headers: Option<&[&str]>, rows: &[Vec<String>]) -> String {
    let columns = headers
        .map(|h| h.len())
        .unwrap_or(0)
        .max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for (i, h) in headers.unwrap_or(&[]).iter().enumerate() {
        widths[i] = widths[i].max(h.width());
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    let mut out = String::new();
    match headers {
        Some(h) => {
            let cells: Vec<String> = h.iter().map(|s| s.to_string()).collect();
            push_line(&mut out, &cells, &widths);
            out.push_str(&rule);
            out.push('\n');
        }
        None => {
            out.push_str(&rule);
            out.push('\n');
        }
    }
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    if headers.is_none() {
        out.push_str(&rule);
        out.push('\n');
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(w.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Two-column key/value table of site metadata
pub fn info_table(info: &SiteInfo) -> String {
    let rows: Vec<Vec<String>> = info
        .iter()
        .map(|(k, v)| {
            let value = match v {
                Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
                other => cell(other),
            };
            vec![k.clone(), value]
        })
        .collect();
    render(None, &rows)
}

pub fn listing_table(files: &[RemoteListingEntry]) -> String {
    let headers = ["path", "is_directory", "size", "updated_at", "sha1_hash"];
    let rows: Vec<Vec<String>> = files
        .iter()
        .map(|f| {
            vec![
                f.path.clone(),
                f.is_directory.to_string(),
                f.size.map(|s| s.to_string()).unwrap_or_default(),
                f.updated_at.clone().unwrap_or_default(),
                f.sha1_hash.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render(Some(&headers[..]), &rows)
}
