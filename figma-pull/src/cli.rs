//! Command-line surface of figma-pull.
//!
//! All business logic lives in `figma-pull-core`; this module parses arguments,
//! builds the core configuration and reports results to the user.
//!
//! - `pull --config <yaml>`: fetch the file and styles, optionally split and export images
//! - `split --input <file.json> --out <dir>`: decompose an already saved file offline

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use figma_pull_core::client::FigmaClient;
use figma_pull_core::config::{SplitConfig, DEFAULT_SPLIT_TYPES};
use figma_pull_core::decompose::{decompose, FsSink};
use figma_pull_core::filename::{DuplicatePolicy, DEFAULT_TEMPLATE};
use figma_pull_core::filter::Selection;
use figma_pull_core::node::Node;
use figma_pull_core::pull::pull;
use std::path::PathBuf;

use crate::load_config::load_config;

/// CLI for figma-pull: dump a Figma file and split it into per-node JSON files.
#[derive(Parser)]
#[clap(
    name = "figma-pull",
    version,
    about = "Pull a Figma file, its styles and images, and split the document into per-node JSON files"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pull the file described by the given config file (requires FIGMA_TOKEN)
    Pull {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Split a previously saved file.json into per-node JSON files
    Split {
        /// Path to a saved `GET /files/{key}` response
        #[clap(long)]
        input: PathBuf,
        /// Directory to write per-node files to
        #[clap(long)]
        out: PathBuf,
        /// Comma-separated node types to split (use ALL for everything)
        #[clap(long, default_value = DEFAULT_SPLIT_TYPES)]
        types: String,
        /// Filename template: placeholders {name}, {id}, {type}
        #[clap(long, default_value = DEFAULT_TEMPLATE)]
        name_template: String,
        /// Use numeric suffixes instead of node ids on duplicate names
        #[clap(long)]
        no_id_in_name: bool,
        /// Stop after this many files
        #[clap(long)]
        max_files: Option<usize>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Pull { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "pull", "Starting pull");
            let client = FigmaClient::new(&config.token)?;
            match pull(&config, &client).await {
                Ok(report) => {
                    println!("Saved: {}", report.file_path.display());
                    println!("Saved: {}", report.styles_path.display());
                    if let (Some(split), Some(dir)) = (&report.split, &report.split_dir) {
                        println!(
                            "Split: wrote {} files under {} (pages: {})",
                            split.written,
                            dir.display(),
                            split.pages.join(", ")
                        );
                    }
                    if let Some(images) = &report.images {
                        println!(
                            "Images: downloaded {}, skipped {}",
                            images.downloaded.len(),
                            images.skipped.len()
                        );
                    }
                    println!("Done.");
                    tracing::info!(command = "pull", "Pull complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "pull", error = %e, "Pull failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::Split {
            input,
            out,
            types,
            name_template,
            no_id_in_name,
            max_files,
        } => {
            tracing::info!(command = "split", input = %input.display(), "Starting split");
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let file_json: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {} as JSON", input.display()))?;
            let document = Node::document_of(&file_json)?;

            let options = SplitConfig {
                types: Selection::parse(&types),
                output_dir: Some(out.clone()),
                name_template,
                duplicates: if no_id_in_name {
                    DuplicatePolicy::NumericSuffix
                } else {
                    DuplicatePolicy::IdSuffix
                },
                max_files,
            };
            let report = decompose(&document, &options, &out, &mut FsSink).map_err(|e| {
                tracing::error!(command = "split", error = %e, "Split failed");
                e
            })?;
            println!(
                "Split: wrote {} files under {} (pages: {})",
                report.written,
                out.display(),
                report.pages.join(", ")
            );
            println!("Image nodes found: {}", report.image_ids.len());
            Ok(())
        }
    }
}
