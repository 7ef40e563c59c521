//! Core download engine: tree flattening, bounded dispatch, per-file outcomes.
//!
//! The engine walks a work's [`MediaNode`] tree depth-first, mirrors the folder
//! structure on disk, and submits one task per file to a [`DispatchSession`]
//! that caps the number of simultaneous transfers. Tasks start as soon as they
//! are submitted, so transfers overlap with the remainder of the walk. Every
//! file node produces exactly one [`FileOutcome`]; no failure aborts sibling
//! work.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::DownloadConfig;
use crate::error::Result;
use crate::fs::{FileSystem, TokioFileSystem};
use crate::model::{MediaNode, NodeKind};
use crate::sanitize::{Platform, sanitize};
use crate::transfer::{HttpTransfer, Transfer};

/// Terminal state of one file task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file already existed on disk; no network call was made.
    Skipped,
    /// The transfer completed and the file is in place.
    Succeeded,
    /// The transfer (or task setup) failed for this file only.
    Failed(String),
}

impl Outcome {
    /// Returns true for [`Outcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The per-file result of a download run, attributable to a concrete path.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Final path of the file (sanitized, under the base directory).
    pub path: PathBuf,
    /// Bytes transferred; zero for skipped and failed files.
    pub bytes: u64,
    /// Terminal state of the task.
    pub outcome: Outcome,
}

/// One planned file transfer, created by the tree walk and consumed once.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// Directory the file belongs in; already created and sanitized.
    pub dest_dir: PathBuf,
    /// Sanitized leaf file name.
    pub file_name: String,
    /// Download URL from the originating file node.
    pub source: String,
}

/// Bounded-concurrency execution context for one work's download.
///
/// Tasks are spawned immediately on [`submit`](Self::submit) but gate on a
/// semaphore before running, so at most `concurrency_limit` execute at any
/// instant. [`wait`](Self::wait) drains the session and returns every outcome.
pub struct DispatchSession {
    permits: Arc<Semaphore>,
    running: JoinSet<FileOutcome>,
}

impl DispatchSession {
    /// Creates a session executing at most `concurrency_limit` tasks at once.
    ///
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn new(concurrency_limit: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(concurrency_limit.max(1))),
            running: JoinSet::new(),
        }
    }

    /// Submits one task. Never blocks the caller; execution starts as soon as
    /// a permit is available.
    pub fn submit<Fut>(&mut self, task: Fut)
    where
        Fut: Future<Output = FileOutcome> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.running.spawn(async move {
            // The semaphore lives as long as the session and is never closed.
            let _permit = permits
                .acquire_owned()
                .await
                .expect("dispatch semaphore closed");
            task.await
        });
    }

    /// Waits until every submitted task has finished and returns the outcomes.
    pub async fn wait(&mut self) -> Vec<FileOutcome> {
        let mut outcomes = Vec::new();
        while let Some(joined) = self.running.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => log::error!("download task panicked: {e}"),
            }
        }
        outcomes
    }
}

/// Core downloader for a work's media tree.
pub struct Downloader<F: FileSystem = TokioFileSystem, T: Transfer = HttpTransfer> {
    fs: Arc<F>,
    transfer: Arc<T>,
    config: DownloadConfig,
    platform: Platform,
}

impl Downloader<TokioFileSystem, HttpTransfer> {
    /// Creates a downloader over the real filesystem and the given HTTP client.
    #[must_use]
    pub fn new(http: reqwest::Client, config: DownloadConfig) -> Self {
        Self::with_parts(
            Arc::new(TokioFileSystem::new()),
            Arc::new(HttpTransfer::new(http)),
            config,
        )
    }
}

impl<F, T> Downloader<F, T>
where
    F: FileSystem + 'static,
    T: Transfer + 'static,
{
    /// Creates a downloader with custom filesystem and transfer implementations.
    #[must_use]
    pub fn with_parts(fs: Arc<F>, transfer: Arc<T>, config: DownloadConfig) -> Self {
        Self {
            fs,
            transfer,
            config,
            platform: Platform::current(),
        }
    }

    /// Overrides the sanitization platform, e.g. when writing to a
    /// Windows-mounted share from a Unix host.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Returns a reference to the download configuration.
    #[must_use]
    pub const fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Downloads every file in `tracks` into `base_dir`, mirroring the folder
    /// structure, with at most `concurrent_files` transfers in flight.
    ///
    /// Returns one [`FileOutcome`] per file node in the tree. Individual task
    /// and subtree failures are reported in the outcomes, never propagated.
    ///
    /// # Errors
    ///
    /// Returns an error only if `base_dir` itself cannot be created.
    pub async fn download_item(
        &self,
        tracks: &[MediaNode],
        base_dir: &Path,
    ) -> Result<Vec<FileOutcome>> {
        self.fs.create_dir_all(base_dir).await?;

        let mut session = DispatchSession::new(self.config.concurrent_files);
        let mut walk_failures = Vec::new();
        self.walk(tracks, base_dir.to_path_buf(), &mut session, &mut walk_failures)
            .await;

        let mut outcomes = session.wait().await;
        outcomes.append(&mut walk_failures);
        Ok(outcomes)
    }

    /// Depth-first walk: create each folder before descending, submit one task
    /// per file as it is discovered, preserving sibling order.
    fn walk<'a>(
        &'a self,
        nodes: &'a [MediaNode],
        dir: PathBuf,
        session: &'a mut DispatchSession,
        failures: &'a mut Vec<FileOutcome>,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            for node in nodes {
                let name = sanitize(&node.title, self.platform);
                match node.kind {
                    NodeKind::File => match &node.media_download_url {
                        Some(url) => session.submit(self.file_task(DownloadTask {
                            dest_dir: dir.clone(),
                            file_name: name,
                            source: url.clone(),
                        })),
                        None => failures.push(FileOutcome {
                            path: dir.join(&name),
                            bytes: 0,
                            outcome: Outcome::Failed("no download URL in listing".to_string()),
                        }),
                    },
                    NodeKind::Folder => {
                        let child_dir = dir.join(&name);
                        if let Err(e) = self.fs.create_dir_all(&child_dir).await {
                            log::error!(
                                "cannot create directory {}: {e}; skipping subtree",
                                child_dir.display()
                            );
                            self.fail_subtree(&node.children, &child_dir, &e.to_string(), failures);
                        } else {
                            self.walk(&node.children, child_dir, session, failures).await;
                        }
                    }
                }
            }
        })
    }

    /// Records a `Failed` outcome for every file leaf under a directory that
    /// could not be created, so the outcome count stays one-per-file.
    fn fail_subtree(
        &self,
        nodes: &[MediaNode],
        dir: &Path,
        reason: &str,
        failures: &mut Vec<FileOutcome>,
    ) {
        for node in nodes {
            let name = sanitize(&node.title, self.platform);
            match node.kind {
                NodeKind::File => failures.push(FileOutcome {
                    path: dir.join(&name),
                    bytes: 0,
                    outcome: Outcome::Failed(format!("parent directory unavailable: {reason}")),
                }),
                NodeKind::Folder => {
                    self.fail_subtree(&node.children, &dir.join(&name), reason, failures);
                }
            }
        }
    }

    /// Builds the future for one file task: skip if present, otherwise fetch.
    fn file_task(&self, task: DownloadTask) -> impl Future<Output = FileOutcome> + Send + 'static {
        let fs = Arc::clone(&self.fs);
        let transfer = Arc::clone(&self.transfer);
        let force_overwrite = self.config.force_overwrite;
        async move {
            let save_path = task.dest_dir.join(&task.file_name);
            if !force_overwrite && fs.exists(&save_path).await {
                log::debug!("{} already exists, skipping", save_path.display());
                return FileOutcome {
                    path: save_path,
                    bytes: 0,
                    outcome: Outcome::Skipped,
                };
            }
            log::info!("downloading {}", save_path.display());
            match transfer
                .fetch(&task.source, &task.dest_dir, &task.file_name)
                .await
            {
                Ok(bytes) => FileOutcome {
                    path: save_path,
                    bytes,
                    outcome: Outcome::Succeeded,
                },
                Err(e) => {
                    log::error!("download of {} failed: {e}", save_path.display());
                    FileOutcome {
                        path: save_path,
                        bytes: 0,
                        outcome: Outcome::Failed(e.to_string()),
                    }
                }
            }
        }
    }
}
