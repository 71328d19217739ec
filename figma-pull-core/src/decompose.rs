//! Document decomposition: one pass over the tree, one JSON file per selected node.
//!
//! The engine is synchronous. Each selected node is resolved to a unique path,
//! written completely and only then is the next node looked at, so no two nodes
//! can race on a destination.
//!
//! # Output layout
//! `<out_dir>/<page>/<name>[__<id>|__<n>].json`, where `<page>` is the top-level
//! page the node sits on (or `ROOT`).
//!
//! # Errors
//! The tree is assumed well formed. The only failure is the sink failing to
//! persist a node; it aborts the run and leaves already written files in place.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::contract::NodeSink;
use crate::error::PullError;
use crate::filename::{page_dir_name, FilenameResolver};
use crate::filter::page_bucket;
use crate::images::collect_image_ids;
use crate::node::Node;
use crate::walk::walk;

/// Outcome of one decomposition run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitReport {
    pub written: usize,
    /// Distinct page buckets that received at least one file, sorted.
    pub pages: Vec<String>,
    /// Ids of image-bearing nodes at or below any written node.
    pub image_ids: BTreeSet<String>,
    /// Written paths in traversal order.
    pub files: Vec<PathBuf>,
}

/// Splits `root` into per-node files under `out_dir`.
pub fn decompose<S: NodeSink>(
    root: &Node,
    options: &SplitConfig,
    out_dir: &Path,
    sink: &mut S,
) -> Result<SplitReport, PullError> {
    let cap = options.max_files.filter(|&n| n > 0);
    let mut resolver = FilenameResolver::new(options.name_template.clone(), options.duplicates);
    let mut pages = BTreeSet::new();
    let mut report = SplitReport::default();

    for (node, crumbs) in walk(root) {
        if node.is_document() || !options.types.selects(node) {
            continue;
        }

        let page = page_bucket(&crumbs);
        let page_dir = out_dir.join(page_dir_name(page));
        let dest = resolver.resolve(node, &page_dir, |p| sink.exists(p));

        sink.persist(&dest, node)?;
        debug!(
            path = %dest.display(),
            id = node.id.as_deref().unwrap_or(""),
            node_type = node.type_tag().unwrap_or(""),
            "Wrote node"
        );
        report.written += 1;
        report.files.push(dest);
        pages.insert(page.to_string());

        if node.has_paint_or_children() {
            report.image_ids.extend(collect_image_ids(node));
        }

        if cap.is_some_and(|max| report.written >= max) {
            info!(max_files = report.written, "Reached max_files, stopping split");
            break;
        }
    }

    report.pages = pages.into_iter().collect();
    info!(
        written = report.written,
        pages = report.pages.len(),
        image_ids = report.image_ids.len(),
        out_dir = %out_dir.display(),
        "Split complete"
    );
    Ok(report)
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PullError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PullError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PullError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| PullError::io(path, e))?;
    Ok(())
}

/// [`NodeSink`] backed by the local filesystem.
#[derive(Debug, Default)]
pub struct FsSink;

impl NodeSink for FsSink {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn persist(&mut self, path: &Path, node: &Node) -> Result<(), PullError> {
        write_json(path, node).map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to persist node");
            e
        })
    }
}
