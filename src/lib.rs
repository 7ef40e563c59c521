//! onsei-dl - A library for mirroring voice works from an ASMR.one-style catalog.
//!
//! This library authenticates against the catalog API, enumerates works
//! through the paginated listing, fetches each work's media tree, and
//! downloads the leaf files concurrently while skipping files already on
//! disk, abstracted from any specific UI.
//!
//! # Example
//!
//! ```no_run
//! use onsei_dl::{ApiClient, DownloadConfig, Downloader};
//!
//! # async fn example() -> onsei_dl::Result<()> {
//! let http = reqwest::Client::new();
//! let mut api = ApiClient::new(http.clone());
//! api.login("account", "password").await?;
//!
//! // Fetch the media tree for one work and mirror it locally
//! let tracks = api.work_tracks(123456).await?;
//! let downloader = Downloader::new(http, DownloadConfig::default());
//! let outcomes = downloader.download_item(&tracks, "downloads/RJ123456".as_ref()).await?;
//! println!("{} files processed", outcomes.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod api;
pub mod config;
pub mod download;
pub mod error;
pub mod format;
pub mod fs;
pub mod model;
pub mod sanitize;
pub mod stats;
pub mod transfer;

// Re-export main types for convenience
pub use api::ApiClient;
pub use config::{Config, DownloadConfig};
pub use download::{DispatchSession, DownloadTask, Downloader, FileOutcome, Outcome};
pub use error::{Error, Result};
pub use format::{format_bytes, format_duration};
pub use fs::{FileSystem, TokioFileSystem};
pub use model::{MediaNode, NodeKind, Pagination, WorkInfo, WorkPage};
pub use sanitize::{Platform, sanitize};
pub use stats::SessionStats;
pub use transfer::{HttpTransfer, Transfer};
