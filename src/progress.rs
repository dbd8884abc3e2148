//! Cargo-style progress display
//!
//! Per-file operations scroll above a spinner that stays on the bottom line.

use crossterm::style::{Color, StyledContent, Stylize};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::logger::Logger;

pub struct ConsoleProgress {
    spinner: ProgressBar,
    start_time: Instant,
    done: AtomicU64,
    show_files: bool,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self::with_bar(ProgressBar::new_spinner(), verbose)
    }

    /// Same display with the spinner drawn nowhere; used when stderr is not a
    /// terminal and in tests. Verbose file lines still print.
    pub fn hidden(verbose: bool) -> Self {
        Self::with_bar(ProgressBar::hidden(), verbose)
    }

    fn with_bar(spinner: ProgressBar, verbose: bool) -> Self {
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self {
            spinner,
            start_time: Instant::now(),
            done: AtomicU64::new(0),
            show_files: verbose,
        }
    }

    /// Print a file operation above the progress line
    fn print_file_op(&self, operation: &str, color: Color, path: &str) {
        if self.show_files {
            self.spinner.suspend(|| {
                println!("  {} {}", label(operation, color), path.with(Color::Cyan));
            });
        }
    }

    fn bump(&self, stage: &str) {
        let n = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.spinner.set_message(format!(
            "{} {} in {:.1}s",
            stage.with(Color::Green).bold(),
            n,
            self.start_time.elapsed().as_secs_f64()
        ));
    }

    pub fn count(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }
}

/// Right-aligned operation label; padding goes on before the styling since
/// `StyledContent` ignores width flags.
fn label(operation: &str, color: Color) -> StyledContent<String> {
    format!("{operation:>9}").with(color).bold()
}

impl Logger for ConsoleProgress {
    fn start(&self, operation: &str, target: &str) {
        self.spinner
            .set_message(format!("{} {}", operation.with(Color::Green).bold(), target));
    }

    fn upload_done(&self, _local: &Path, remote: &str) {
        self.print_file_op("Uploaded", Color::Green, remote);
        self.bump("Uploading");
    }

    fn skipped(&self, local: &Path) {
        self.print_file_op("Skipped", Color::DarkGrey, &local.display().to_string());
    }

    fn delete(&self, remote: &str) {
        self.print_file_op("Deleted", Color::Yellow, remote);
        self.bump("Deleting");
    }

    fn error(&self, context: &str, target: &str, msg: &str) {
        self.spinner.suspend(|| {
            eprintln!(
                "  {} {} ({}): {}",
                label("Failed", Color::Red),
                target,
                context,
                msg
            );
        });
    }

    fn done(&self, operation: &str, files: u64, failed: u64, seconds: f64) {
        let label = if failed == 0 {
            "Completed".with(Color::Green).bold()
        } else {
            "Finished".with(Color::Yellow).bold()
        };
        let failures = if failed > 0 {
            format!(", {failed} failed")
        } else {
            String::new()
        };
        self.spinner.finish_with_message(format!(
            "{label} {operation}: {files} files{failures} in {seconds:.1}s"
        ));
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
