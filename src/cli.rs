//! Command-line surface

use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "neosync",
    author,
    version,
    about = "Neosync - push, mirror and prune a local site on Neocities",
    after_help = "Credentials come from NEOCITIES_API_KEY, or NEOCITIES_USER and NEOCITIES_PASS."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with user/password/api_key/api_url/timeout_secs (environment wins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append a line per file operation to this file
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show a spinner while transferring
    #[arg(short, long, global = true)]
    pub progress: bool,

    /// With --progress, print every uploaded, skipped and deleted file
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Display information about a Neocities site
    Info {
        /// Site name (`name` or `name.neocities.org`); defaults to your own
        site: Option<String>,
    },
    /// Upload a single file
    Upload {
        /// Local file
        source: PathBuf,
        /// Remote file name and location; must have a file extension
        destination: Option<String>,
    },
    /// Upload every file under a directory to the web root, unfiltered
    UploadRoot {
        /// Directory to mirror (default: current directory)
        dirname: Option<PathBuf>,
    },
    /// Delete one or more files from the site
    Delete {
        #[arg(required = true, num_args = 1..)]
        filenames: Vec<String>,
    },
    /// Delete all remote files except index.html
    DeleteAll,
    /// List files of a Neocities site
    List { site: Option<String> },
    /// Push a directory recursively, skipping unsupported file types
    Push { dirc: PathBuf },
}

/// Lower-case the subcommand token so `PUSH` and `Upload-Root` work too
pub fn normalize_command_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let cmd = Args::command();
    let names: Vec<String> = cmd
        .get_subcommands()
        .map(|s| s.get_name().to_string())
        .collect();

    let mut out: Vec<OsString> = args.into_iter().collect();
    let mut expect_value = false;
    for arg in out.iter_mut().skip(1) {
        let Some(s) = arg.to_str() else { break };
        if expect_value {
            expect_value = false;
            continue;
        }
        if s.starts_with('-') {
            expect_value = !s.contains('=') && (s == "--config" || s == "--log-file");
            continue;
        }
        let lower = s.to_lowercase();
        if names.iter().any(|n| *n == lower) {
            *arg = OsString::from(lower);
        }
        break;
    }
    out
}
