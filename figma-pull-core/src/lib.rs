#![doc = "figma-pull-core: core logic library for figma-pull."]

//! This crate contains the data model, the document decomposition engine and the
//! Figma transport used by the `figma-pull` CLI.
//!
//! # Layout
//! - [`node`]: serde model of Figma nodes and paints
//! - [`walk`], [`images`], [`filter`], [`filename`]: the pieces the engine is built from
//! - [`decompose`]: splits one document into per-node JSON files
//! - [`contract`]: the `DesignSource` and `NodeSink` seams (mockable)
//! - [`client`], [`export`], [`pull`]: HTTP client, image export and the full pull pipeline

pub mod client;
pub mod config;
pub mod contract;
pub mod decompose;
pub mod error;
pub mod export;
pub mod filename;
pub mod filter;
pub mod images;
pub mod node;
pub mod pull;
pub mod walk;

pub use error::PullError;
