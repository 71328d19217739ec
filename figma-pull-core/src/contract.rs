//! # contract: seams between the pull pipeline and the outside world
//!
//! Two traits decouple the core from I/O:
//!
//! - [`DesignSource`]: where documents, styles and image renditions come from.
//!   Implemented by [`crate::client::FigmaClient`] for the real API and by
//!   `MockDesignSource` (generated by `mockall`) in tests.
//! - [`NodeSink`]: where per-node records go. Implemented by
//!   [`crate::decompose::FsSink`] for the filesystem.
//!
//! ## Error Handling
//! Both traits report failures as [`PullError`]; the pipeline treats any sink
//! failure as fatal for the run.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde_json::Value;

use crate::config::ImageFormat;
use crate::error::PullError;
use crate::node::Node;

/// Map of node id to a temporary rendition URL. `None` when the API could not render the node.
pub type ImageUrls = HashMap<String, Option<String>>;

/// Read access to a remote design file.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Full file JSON (`GET /files/{key}`).
    async fn get_file(&self, file_key: &str) -> Result<Value, PullError>;

    /// Published styles listing (`GET /files/{key}/styles`).
    async fn get_styles(&self, file_key: &str) -> Result<Value, PullError>;

    /// Rendition URLs for at most one batch of node ids.
    async fn get_image_urls(
        &self,
        file_key: &str,
        node_ids: Vec<String>,
        format: ImageFormat,
        scale: u32,
    ) -> Result<ImageUrls, PullError>;

    /// Raw bytes behind a rendition URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>, PullError>;
}

/// Destination for decomposed node records.
pub trait NodeSink {
    /// Whether `path` is already occupied by something outside the current run.
    fn exists(&self, path: &Path) -> bool;

    /// Durably writes `node` to `path`, creating parent directories as needed.
    fn persist(&mut self, path: &Path, node: &Node) -> Result<(), PullError>;
}
