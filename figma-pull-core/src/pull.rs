//! High-level pipeline: fetch → split → export images → README.
//!
//! This module ties the pieces of the crate together for one design file:
//!   - Saves the full file JSON and the styles listing under the output directory
//!   - Optionally decomposes the document into per-node files (see [`crate::decompose`])
//!   - Exports images for explicitly listed ids and, when enabled, for every
//!     image-bearing node the split discovered
//!   - Writes a short README describing the dump
//!
//! # Error Handling
//! Fail-fast: a failed API request or a failed write returns immediately. Images
//! without a rendition URL or with a failed download are skipped and reported.
//!
//! # Navigation
//! - Main entrypoint: [`pull`]
//! - Output: [`PullReport`]

use std::fs;
use std::path::PathBuf;

use tracing::{error, info};

use crate::config::PullConfig;
use crate::contract::DesignSource;
use crate::decompose::{decompose, write_json, FsSink, SplitReport};
use crate::error::PullError;
use crate::export::{export_images, ExportReport};
use crate::node::Node;

pub const README: &str = "\
Design dump saved.
- file.json: full document
- styles.json: color/typography styles
- nodes/: per-node JSON files (if split is enabled), grouped by page
- images/: exported nodes (if image ids are configured or auto images is enabled)

To find node ids:
- Use Figma inspect or GET /v1/files/{file_key} and search by names/layers.
- Map styles to your theme (colors, typography, shapes).";

#[derive(Debug)]
pub struct PullReport {
    pub file_path: PathBuf,
    pub styles_path: PathBuf,
    pub split_dir: Option<PathBuf>,
    pub split: Option<SplitReport>,
    pub images: Option<ExportReport>,
    pub readme_path: PathBuf,
}

pub async fn pull<S>(config: &PullConfig, source: &S) -> Result<PullReport, PullError>
where
    S: DesignSource + ?Sized,
{
    info!(file_key = %config.file_key, "[PULL] Starting pull");
    let out_dir = &config.output_dir;
    fs::create_dir_all(out_dir).map_err(|e| {
        error!(error = ?e, path = %out_dir.display(), "[PULL][ERROR] Failed to create output directory");
        PullError::io(out_dir, e)
    })?;

    let file_json = source.get_file(&config.file_key).await?;
    let file_path = out_dir.join("file.json");
    write_json(&file_path, &file_json)?;
    info!(path = %file_path.display(), "[PULL] Saved file");

    let styles_json = source.get_styles(&config.file_key).await?;
    let styles_path = out_dir.join("styles.json");
    write_json(&styles_path, &styles_json)?;
    info!(path = %styles_path.display(), "[PULL] Saved styles");

    let split_dir = config.split_dir();
    let split = match (&config.split, &split_dir) {
        (Some(split_config), Some(dir)) => {
            let document = Node::document_of(&file_json)?;
            let report = decompose(&document, split_config, dir, &mut FsSink)?;
            info!(
                written = report.written,
                dir = %dir.display(),
                pages = %report.pages.join(", "),
                "[PULL] Split document"
            );
            Some(report)
        }
        _ => None,
    };

    let mut image_ids = config.images.ids.clone();
    if config.images.auto {
        if let Some(report) = &split {
            image_ids.extend(report.image_ids.iter().cloned());
        }
    }

    let images = if image_ids.is_empty() {
        None
    } else {
        let report = export_images(
            source,
            &config.file_key,
            &image_ids,
            config.images.format,
            config.images.scale,
            &config.image_dir(),
        )
        .await?;
        info!(
            downloaded = report.downloaded.len(),
            skipped = report.skipped.len(),
            "[PULL] Exported images"
        );
        Some(report)
    };

    let readme_path = out_dir.join("README.txt");
    fs::write(&readme_path, README).map_err(|e| PullError::io(&readme_path, e))?;

    info!("[PULL] Done");
    Ok(PullReport {
        file_path,
        styles_path,
        split_dir,
        split,
        images,
        readme_path,
    })
}
