//! `load_config` module: Loads a static YAML pull config and injects the API token from the environment.
//!
//! This module is the only place where user YAML is parsed and mapped to the core's
//! strongly-typed [`PullConfig`].
//!
//! # Accepted schema
//! ```yaml
//! file_key: UTd0VGhnFYgvkn6NLepGAM
//! output_dir: design            # default: design
//! images:                       # optional
//!   ids: ["2036:4956"]
//!   format: png                 # png | jpg | svg | pdf
//!   scale: 2
//!   auto: true                  # also export images found while splitting
//! split:                        # optional; `split: {}` enables it with defaults
//!   types: [FRAME, COMPONENT, INSTANCE]   # or [ALL]
//!   output_dir: design/nodes    # default: <output_dir>/nodes
//!   name_template: "{name}.json"
//!   duplicates: id_suffix       # id_suffix | numeric_suffix
//!   max_files: 500
//! ```
//!
//! # Errors
//! All errors use `anyhow::Error` and are surfaced at the CLI boundary.

use anyhow::Result;
use figma_pull_core::client::TOKEN_ENV;
use figma_pull_core::config::{ImagesConfig, PullConfig, SplitConfig};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct RawConfig {
    file_key: String,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    #[serde(default)]
    images: ImagesConfig,
    #[serde(default)]
    split: Option<SplitConfig>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("design")
}

/// Loads a static YAML config file (no secrets) and injects `FIGMA_TOKEN` from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PullConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if raw.file_key.trim().is_empty() {
        error!(config_path = ?path_ref, "file_key must not be empty");
        anyhow::bail!("file_key must not be empty");
    }

    let token = match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            info!("{TOKEN_ENV} found in env");
            token.trim().to_string()
        }
        _ => {
            error!("{TOKEN_ENV} environment variable not set");
            anyhow::bail!("{TOKEN_ENV} environment variable not set");
        }
    };

    let config = PullConfig {
        token,
        file_key: raw.file_key,
        output_dir: raw.output_dir,
        images: raw.images,
        split: raw.split,
    };
    config.trace_loaded();
    Ok(config)
}
