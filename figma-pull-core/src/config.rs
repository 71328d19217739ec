use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::filename::{DuplicatePolicy, DEFAULT_TEMPLATE};
use crate::filter::Selection;

/// Node types split out when nothing else is configured.
pub const DEFAULT_SPLIT_TYPES: &str = "FRAME,COMPONENT,INSTANCE";

/// Everything one pull needs, secrets included.
#[derive(Debug, Clone)]
pub struct PullConfig {
    pub token: String,
    pub file_key: String,
    pub output_dir: PathBuf,
    pub images: ImagesConfig,
    pub split: Option<SplitConfig>,
}

impl PullConfig {
    pub fn trace_loaded(&self) {
        info!(
            file_key = %self.file_key,
            output_dir = %self.output_dir.display(),
            split = self.split.is_some(),
            explicit_images = self.images.ids.len(),
            auto_images = self.images.auto,
            "Loaded PullConfig"
        );
        debug!(images = ?self.images, split = ?self.split, "PullConfig loaded (full debug)");
    }

    /// Directory the per-node files go to: the configured one, else `<output_dir>/nodes`.
    pub fn split_dir(&self) -> Option<PathBuf> {
        self.split.as_ref().map(|s| {
            s.output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.join("nodes"))
        })
    }

    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join("images")
    }
}

/// Rendition format accepted by the images endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Node ids to export regardless of what the split finds.
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default)]
    pub format: ImageFormat,
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Also export every image-bearing node found during the split.
    #[serde(default)]
    pub auto: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            format: ImageFormat::default(),
            scale: default_scale(),
            auto: false,
        }
    }
}

fn default_scale() -> u32 {
    1
}

/// Options for decomposing the document into per-node files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_types")]
    pub types: Selection,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_template")]
    pub name_template: String,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    /// Stop after this many files. Zero or absent means no limit.
    #[serde(default)]
    pub max_files: Option<usize>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            types: default_types(),
            output_dir: None,
            name_template: default_template(),
            duplicates: DuplicatePolicy::default(),
            max_files: None,
        }
    }
}

fn default_types() -> Selection {
    Selection::parse(DEFAULT_SPLIT_TYPES)
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}
