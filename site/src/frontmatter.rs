//! YAML front matter at the top of page sources.
//!
//! A page may open with a `---` fenced YAML block. Recognized keys drive the
//! build (`layout`, `permalink`); every key is also exposed to templates.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SiteError;

const FENCE: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    /// Template name under the includes directory, e.g. `base.html`.
    pub layout: Option<String>,
    /// Output URL overriding the path-derived one.
    pub permalink: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A page source split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSource<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
}

/// Split `source` into its raw YAML block (if any) and the remaining body.
pub fn split(source: &str) -> (Option<&str>, &str) {
    let text = source.strip_prefix('\u{feff}').unwrap_or(source);
    let Some(after_fence) = text.strip_prefix(FENCE) else {
        return (None, source);
    };
    let Some(rest) = after_fence.strip_prefix("\r\n").or_else(|| after_fence.strip_prefix('\n')) else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == FENCE {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    // No closing fence: treat the whole file as body.
    (None, source)
}

/// Parse the front matter of the page at `path`.
pub fn parse<'a>(source: &'a str, path: &Path) -> Result<PageSource<'a>, SiteError> {
    let (yaml, body) = split(source);
    let front_matter = match yaml {
        Some(raw) if !raw.trim().is_empty() => serde_yaml::from_str(raw)
            .map_err(|err| SiteError::FrontMatter { path: path.to_path_buf(), message: err.to_string() })?,
        _ => FrontMatter::default(),
    };
    Ok(PageSource { front_matter, body })
}

#[cfg(test)]
#[path = "frontmatter_test.rs"]
mod tests;
