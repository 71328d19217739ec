//! Turns node names into sanitized, collision-free `.json` paths.
//!
//! A [`FilenameResolver`] is created per decomposition run. It owns the registry of
//! every path handed out so far, so two nodes resolved in the same run never share a
//! destination even before either file is flushed to disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::node::Node;

pub const MAX_NAME_LEN: usize = 120;
pub const JSON_EXT: &str = ".json";
pub const DEFAULT_TEMPLATE: &str = "{name}.json";

static RESERVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("reserved-character pattern is valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// What to do when a resolved path is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Append `__<id>` (colons replaced by underscores).
    #[default]
    IdSuffix,
    /// Append `__1`, `__2`, ... until the path is free.
    NumericSuffix,
}

/// Makes `name` safe to use as a single path component.
///
/// Trims, falls back to `fallback` when empty, replaces `\ / : * ? " < > |` with `_`,
/// collapses whitespace runs and truncates to [`MAX_NAME_LEN`] characters.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    let base = if trimmed.is_empty() { fallback } else { trimmed };
    let replaced = RESERVED.replace_all(base, "_");
    let collapsed = WHITESPACE.replace_all(&replaced, " ");
    truncate_chars(&collapsed, MAX_NAME_LEN)
}

/// First `max` characters of `s`; a cut that lands after a space drops it.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((cut, _)) => s[..cut].trim_end().to_string(),
        None => s.to_string(),
    }
}

/// Filesystem-safe form of a node id (`12:34` -> `12_34`).
pub fn short_id(node_id: &str) -> String {
    node_id.replace(':', "_")
}

/// Directory name for a page bucket. Dot-only names are neutralised so a page
/// can never address the parent directory.
pub fn page_dir_name(page: &str) -> String {
    let name = sanitize_filename(page, crate::filter::ROOT_PAGE);
    if name.chars().all(|c| c == '.') {
        name.replace('.', "_")
    } else {
        name
    }
}

/// Substitutes `{name}`, `{id}` and `{type}` in a filename template.
pub fn render_template(template: &str, name: &str, id: &str, node_type: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{id}", id)
        .replace("{type}", node_type)
}

fn split_json_ext(name: &str) -> (&str, &str) {
    let cut = name.len().saturating_sub(JSON_EXT.len());
    if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(JSON_EXT) {
        (&name[..cut], &name[cut..])
    } else {
        (name, "")
    }
}

/// Longest stem that still leaves room for `.json` within [`MAX_NAME_LEN`].
const MAX_STEM_LEN: usize = MAX_NAME_LEN - JSON_EXT.len();

/// Sanitizes `name` into a `.json` filename of at most [`MAX_NAME_LEN`] characters.
///
/// A trailing `.json` (any case) is removed before truncation, so the stem is
/// cut and the extension always survives intact. Other dotted suffixes are
/// part of the stem.
pub fn enforce_json(name: &str, fallback: &str) -> String {
    let (stem, _) = split_json_ext(name.trim());
    suffixed_filename(stem, "", fallback)
}

/// `<stem><suffix>.json`, shortening the stem so the suffix is never cut off.
fn suffixed_filename(stem: &str, suffix: &str, fallback: &str) -> String {
    let stem = sanitize_filename(stem, fallback);
    let room = MAX_STEM_LEN.saturating_sub(suffix.chars().count());
    let head = truncate_chars(&stem, room);
    let joined = truncate_chars(&format!("{head}{suffix}"), MAX_STEM_LEN);
    format!("{joined}{JSON_EXT}")
}

/// Per-run path allocator.
#[derive(Debug)]
pub struct FilenameResolver {
    template: String,
    policy: DuplicatePolicy,
    /// Every path handed out this run, mapped to the next numeric suffix to try
    /// when that path is requested again.
    claimed: HashMap<PathBuf, usize>,
}

impl FilenameResolver {
    pub fn new(template: impl Into<String>, policy: DuplicatePolicy) -> Self {
        Self {
            template: template.into(),
            policy,
            claimed: HashMap::new(),
        }
    }

    /// Resolves a destination for `node` inside `page_dir` and claims it.
    ///
    /// `exists` reports whether a path is already occupied outside this run
    /// (normally a filesystem probe).
    pub fn resolve<F>(&mut self, node: &Node, page_dir: &Path, exists: F) -> PathBuf
    where
        F: Fn(&Path) -> bool,
    {
        let node_type = node.type_tag().unwrap_or("Node");
        let id = node.id.as_deref().unwrap_or("");
        let raw_name = node
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(node_type);
        let name = sanitize_filename(raw_name, node_type);

        let rendered = render_template(&self.template, &name, id, node_type);
        let filename = enforce_json(&rendered, node_type);
        let mut dest = page_dir.join(filename);

        if self.is_taken(&dest, &exists) {
            dest = match self.policy {
                DuplicatePolicy::IdSuffix => {
                    let candidate = self.with_id_suffix(&dest, id, node_type);
                    if self.is_taken(&candidate, &exists) {
                        self.next_numbered(&candidate, &exists)
                    } else {
                        candidate
                    }
                }
                DuplicatePolicy::NumericSuffix => self.next_numbered(&dest, &exists),
            };
        }

        self.claimed.entry(dest.clone()).or_insert(1);
        dest
    }

    fn is_taken<F>(&self, path: &Path, exists: &F) -> bool
    where
        F: Fn(&Path) -> bool,
    {
        self.claimed.contains_key(path) || exists(path)
    }

    fn with_id_suffix(&self, dest: &Path, id: &str, node_type: &str) -> PathBuf {
        let filename = file_name_of(dest);
        let (stem, _) = split_json_ext(&filename);
        let suffix = sanitize_filename(&format!("__{}", short_id(id)), "");
        dest.with_file_name(suffixed_filename(stem, &suffix, node_type))
    }

    /// First free `<stem>__<n><ext>` next to `base`. The counter is kept per
    /// `base`, so unrelated collision groups in one directory do not share it.
    fn next_numbered<F>(&mut self, base: &Path, exists: &F) -> PathBuf
    where
        F: Fn(&Path) -> bool,
    {
        let filename = file_name_of(base);
        let (stem, _) = split_json_ext(&filename);
        let mut idx = self.claimed.get(base).copied().unwrap_or(1);
        let candidate = loop {
            let candidate = base.with_file_name(suffixed_filename(stem, &format!("__{idx}"), "node"));
            if !self.is_taken(&candidate, exists) {
                break candidate;
            }
            idx += 1;
        };
        self.claimed.insert(base.to_path_buf(), idx + 1);
        candidate
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
