//! Image export: asks the source for renditions of node ids and saves them locally.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::ImageFormat;
use crate::contract::DesignSource;
use crate::error::PullError;
use crate::filename::short_id;

/// Upper bound on ids per images request.
pub const IMAGE_BATCH_LIMIT: usize = 100;

/// Downloads in flight within one batch.
const DOWNLOAD_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub downloaded: Vec<PathBuf>,
    /// Ids with no rendition URL or a failed download.
    pub skipped: Vec<String>,
}

/// Local file for a node rendition: `<image_dir>/<id with : -> _>.<ext>`.
pub fn image_path(image_dir: &Path, node_id: &str, format: ImageFormat) -> PathBuf {
    image_dir.join(format!("{}.{}", short_id(node_id), format.as_str()))
}

/// Exports `ids` in batches of [`IMAGE_BATCH_LIMIT`].
///
/// Duplicate ids are requested once, first occurrence wins the position. A failed
/// URL request aborts the export; a missing URL or failed download only skips
/// that node.
pub async fn export_images<S>(
    source: &S,
    file_key: &str,
    ids: &[String],
    format: ImageFormat,
    scale: u32,
    image_dir: &Path,
) -> Result<ExportReport, PullError>
where
    S: DesignSource + ?Sized,
{
    let mut seen = HashSet::new();
    let unique: Vec<String> = ids
        .iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect();

    let mut report = ExportReport::default();
    for chunk in unique.chunks(IMAGE_BATCH_LIMIT) {
        let urls = source
            .get_image_urls(file_key, chunk.to_vec(), format, scale)
            .await?;

        // Request order, not map order, so output is deterministic.
        let mut targets = Vec::new();
        for id in chunk {
            match urls.get(id).cloned().flatten() {
                Some(url) => targets.push((id.clone(), url)),
                None => {
                    warn!(node_id = %id, "Skip: no URL returned");
                    report.skipped.push(id.clone());
                }
            }
        }

        let mut downloads = stream::iter(targets)
            .map(|(id, url)| async move {
                let result = source.download(&url).await;
                (id, result)
            })
            .buffered(DOWNLOAD_CONCURRENCY);

        while let Some((id, result)) = downloads.next().await {
            let bytes = match result {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(node_id = %id, error = %e, "Failed to download image");
                    report.skipped.push(id);
                    continue;
                }
            };
            let dest = image_path(image_dir, &id, format);
            fs::create_dir_all(image_dir).map_err(|e| PullError::io(image_dir, e))?;
            fs::write(&dest, &bytes).map_err(|e| PullError::io(&dest, e))?;
            info!(path = %dest.display(), "Downloaded image");
            report.downloaded.push(dest);
        }
    }

    Ok(report)
}
