//! The byte-transfer primitive: stream one URL to one local file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Returns the `.part` file path for a given final path.
fn part_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".part");
    PathBuf::from(s)
}

/// Abstraction over a single URL-to-file byte transfer.
///
/// The download engine decides *what* to fetch and *where* it goes; this trait
/// owns the transport. One call fetches one file and returns the number of
/// bytes written, or an error without claiming the file is complete.
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Streams `source` into `dest_dir/file_name`.
    async fn fetch(&self, source: &str, dest_dir: &Path, file_name: &str) -> Result<u64>;
}

/// Default transfer implementation over a shared `reqwest::Client`.
///
/// Downloads into a `.part` file and renames it into place on success, so a
/// file that exists at its final path is always complete. On error the `.part`
/// file is removed best-effort.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    http: reqwest::Client,
}

impl HttpTransfer {
    /// Creates a transfer primitive backed by the given client.
    #[must_use]
    pub const fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn fetch(&self, source: &str, dest_dir: &Path, file_name: &str) -> Result<u64> {
        let final_path = dest_dir.join(file_name);
        let pp = part_path(&final_path);

        let response = self.http.get(source).send().await?.error_for_status()?;

        let result: Result<u64> = async {
            let mut file = tokio::fs::File::create(&pp).await?;
            let mut written: u64 = 0;
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(written)
        }
        .await;

        match result {
            Ok(written) => {
                tokio::fs::rename(&pp, &final_path).await?;
                Ok(written)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&pp).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_path_appends_extension() {
        assert_eq!(
            part_path(Path::new("foo/bar.zip")),
            PathBuf::from("foo/bar.zip.part")
        );
        assert_eq!(part_path(Path::new("file.txt")), PathBuf::from("file.txt.part"));
    }

    #[test]
    fn http_transfer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpTransfer>();
    }
}
