//! API response models: the per-work media tree and catalog listing pages.

use serde::Deserialize;

/// Whether a [`MediaNode`] is a folder or a downloadable file.
///
/// The API reports a `type` string per node: `"folder"` for folders and a
/// media kind (`"audio"`, `"image"`, `"text"`, ...) for leaves. Anything that
/// is not a folder is treated as a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
    /// A folder with zero or more children.
    Folder,
    /// A downloadable leaf file.
    File,
}

impl From<String> for NodeKind {
    fn from(kind: String) -> Self {
        if kind == "folder" {
            Self::Folder
        } else {
            Self::File
        }
    }
}

impl NodeKind {
    /// Returns true if this node is a folder.
    #[must_use]
    pub const fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// One node in a work's media listing tree.
///
/// Constructed once from the parsed `tracks` response, then read-only input
/// to the download engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaNode {
    /// Node kind; folders carry children, files carry a download URL.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Display name; may contain characters illegal in some filesystems.
    pub title: String,
    /// Child nodes, in listing order. Empty for file nodes.
    #[serde(default)]
    pub children: Vec<MediaNode>,
    /// Direct download URL for file nodes. Missing on malformed listings.
    #[serde(default)]
    pub media_download_url: Option<String>,
    /// Streaming URL, present on audio nodes. Unused by the downloader.
    #[serde(default)]
    pub media_stream_url: Option<String>,
}

impl MediaNode {
    /// Counts the file leaves in the tree rooted at this node.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Folder => self.children.iter().map(Self::file_count).sum(),
        }
    }
}

/// Summary of one work in a catalog listing page.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkInfo {
    /// Numeric work id (the RJ number without the prefix).
    pub id: u64,
    /// Work title.
    pub title: String,
}

/// Pagination metadata returned alongside each catalog page.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based index of the returned page.
    pub current_page: u32,
    /// Number of works per page.
    pub page_size: u32,
    /// Total number of works matching the query.
    pub total_count: u64,
}

impl Pagination {
    /// Total number of pages for this query.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size as u64)
    }
}

/// One page of the catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkPage {
    /// Works on this page, in listing order.
    pub works: Vec<WorkInfo>,
    /// Pagination metadata for the overall query.
    pub pagination: Pagination,
}
