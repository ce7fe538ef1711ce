//! Site configuration parsed from `site.yaml` plus environment overrides.
//!
//! ```yaml
//! title: "Field Notes"
//! base_url: "/"
//! input_dir: content
//! output_dir: _site
//! includes_dir: _includes
//! passthrough:
//!   - "**/*.yaml"
//!   - "assets/**"
//! markdown:
//!   raw_html: true
//!   external_links: true
//! highlight:
//!   enabled: true
//!   light_theme: InspiredGitHub
//!   dark_theme: base16-ocean.dark
//! ```
//!
//! Every field is optional. A missing file yields [`SiteConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

pub const DEFAULT_CONFIG_FILE: &str = "site.yaml";
pub const DEFAULT_INPUT_DIR: &str = "content";
pub const DEFAULT_OUTPUT_DIR: &str = "_site";
pub const DEFAULT_INCLUDES_DIR: &str = "_includes";
pub const DEFAULT_BASE_URL: &str = "/";
pub const DEFAULT_LIGHT_THEME: &str = "InspiredGitHub";
pub const DEFAULT_DARK_THEME: &str = "base16-ocean.dark";
pub const DEFAULT_STYLESHEET: &str = "highlight.css";

/// Files copied verbatim into the output tree.
pub const DEFAULT_PASSTHROUGH: [&str; 6] = ["**/*.yaml", "**/*.sql", "**/*.png", "**/*.sh", "**/*.svg", "assets/**"];

const ENV_INPUT_DIR: &str = "DOCSITE_INPUT_DIR";
const ENV_OUTPUT_DIR: &str = "DOCSITE_OUTPUT_DIR";
const ENV_BASE_URL: &str = "DOCSITE_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub base_url: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Layout directory, relative to `input_dir`.
    pub includes_dir: PathBuf,
    /// Glob patterns relative to `input_dir`.
    pub passthrough: Vec<String>,
    pub markdown: MarkdownConfig,
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            includes_dir: PathBuf::from(DEFAULT_INCLUDES_DIR),
            passthrough: DEFAULT_PASSTHROUGH.iter().map(ToString::to_string).collect(),
            markdown: MarkdownConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Pass inline and block HTML through to the output. When off, HTML is
    /// shown as escaped text.
    pub raw_html: bool,
    /// Open `http(s)://` links in a new browsing context.
    pub external_links: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { raw_html: true, external_links: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enabled: bool,
    pub light_theme: String,
    pub dark_theme: String,
    /// Output-relative path of the generated token stylesheet.
    pub stylesheet: PathBuf,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            light_theme: DEFAULT_LIGHT_THEME.to_string(),
            dark_theme: DEFAULT_DARK_THEME.to_string(),
            stylesheet: PathBuf::from(DEFAULT_STYLESHEET),
        }
    }
}

impl SiteConfig {
    /// Load config from `path`, falling back to defaults when the file does
    /// not exist, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let config = match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_yaml(&raw, path)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no site config found, using defaults");
                Self::default()
            }
            Err(err) => return Err(SiteError::io(path)(err)),
        };
        Ok(config.with_overrides(env_lookup))
    }

    /// Parse YAML config text. `origin` is only used for error reporting.
    pub fn from_yaml(raw: &str, origin: &Path) -> Result<Self, SiteError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|source| SiteError::Config { path: origin.to_path_buf(), source })
    }

    /// Apply `DOCSITE_*` overrides resolved through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_INPUT_DIR) {
            self.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        self
    }

    /// Absolute-or-relative path of the layout directory.
    pub fn includes_path(&self) -> PathBuf {
        self.input_dir.join(&self.includes_dir)
    }
}

fn env_lookup(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
