//! Neosync - publish a local directory to a Neocities site
//!
//! Design goals:
//! - One linear pipeline per command, nothing kept between runs
//! - Credentials read once at startup and passed down explicitly
//! - Remote refusals printed verbatim, never retried

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use neosync::cli::{normalize_command_args, Args, Command};
use neosync::config::Config;
use neosync::logger::{Logger, MultiLogger, NoopLogger, TextLogger};
use neosync::net::HttpTransport;
use neosync::progress::ConsoleProgress;
use neosync::table::{info_table, listing_table};
use neosync::{SiteSync, SyncError, SyncReport};

fn main() -> ExitCode {
    // Set up Ctrl-C handler
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupted by user. Exiting (Ctrl-C)...");
        // Exit immediately with 130 (128 + SIGINT)
        std::process::exit(130);
    }) {
        eprintln!("warning: could not install Ctrl-C handler: {e}");
    }

    let args = Args::parse_from(normalize_command_args(std::env::args_os()));

    match run(&args) {
        Ok(code) => code,
        Err(err) => report_error(&err),
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let transport = HttpTransport::new(&config).context("Failed to build HTTP client")?;
    let logger = build_logger(args)?;
    let sync = SiteSync::new(&transport, &*logger);

    match &args.command {
        Command::Info { site } => {
            let info = sync.info(site.as_deref())?;
            print!("{}", info_table(&info));
        }
        Command::List { site } => {
            let listing = sync.list(site.as_deref())?;
            print!("{}", listing_table(&listing.files));
        }
        Command::Upload {
            source,
            destination,
        } => {
            sync.upload(source, destination.as_deref())?;
        }
        Command::UploadRoot { dirname } => {
            sync.upload_root(dirname.as_deref())?;
        }
        Command::Delete { filenames } => {
            sync.delete(filenames)?;
        }
        Command::DeleteAll => {
            sync.delete_all()?;
        }
        Command::Push { dirc } => {
            let report = sync.push(dirc)?;
            return Ok(finish_push(&report));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Choose sinks once; NoopLogger when nothing was asked for
fn build_logger(args: &Args) -> Result<Box<dyn Logger>> {
    let mut multi = MultiLogger::default();
    if let Some(ref p) = args.log_file {
        let text = TextLogger::new(p)
            .with_context(|| format!("Failed to open log file {}", p.display()))?;
        multi.push(Box::new(text));
    }
    if args.progress {
        let progress = if std::io::stderr().is_terminal() {
            ConsoleProgress::new(args.verbose)
        } else {
            ConsoleProgress::hidden(args.verbose)
        };
        multi.push(Box::new(progress));
    }
    if multi.is_empty() {
        Ok(Box::new(NoopLogger))
    } else {
        Ok(Box::new(multi))
    }
}

/// Print the raw body of every refused file; non-zero exit if any
fn finish_push(report: &SyncReport) -> ExitCode {
    if report.is_clean() {
        return ExitCode::SUCCESS;
    }
    for (remote, raw) in &report.failures {
        eprintln!("{remote}: {raw}");
    }
    eprintln!(
        "{} of {} files were refused",
        report.failures.len(),
        report.failures.len() + report.uploaded.len()
    );
    ExitCode::FAILURE
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<SyncError>() {
        // The raw response is the message
        Some(SyncError::RemoteProtocol { raw, .. }) => println!("{raw}"),
        Some(SyncError::Validation(msg)) => eprintln!("{msg}"),
        _ => eprintln!("Error: {err:#}"),
    }
    let code = err
        .downcast_ref::<SyncError>()
        .map(SyncError::exit_code)
        .unwrap_or(1);
    ExitCode::from(code as u8)
}
