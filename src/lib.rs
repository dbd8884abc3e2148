//! Neosync Library
//!
//! Keep a local directory tree and a Neocities site in step: push, mirror and prune.

pub mod cli;
pub mod config;
pub mod error;
pub mod ext_filter;
pub mod fs_enum;
pub mod inventory;
pub mod logger;
pub mod net;
pub mod path_map;
pub mod progress;
pub mod sync;
pub mod table;
pub mod transport;

pub use error::{Result, SyncError};
pub use sync::{SiteSync, SyncReport};
