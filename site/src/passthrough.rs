//! Passthrough copy: files matching configured globs are copied verbatim.

use std::path::Path;

use wax::{Glob, Pattern};

use crate::error::SiteError;

pub struct Passthrough {
    globs: Vec<(String, Glob<'static>)>,
}

impl Passthrough {
    /// Compile `patterns`; each is matched against input-relative paths.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, SiteError> {
        let globs = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Glob::new(pattern)
                    .map(Glob::into_owned)
                    .map(|glob| (pattern.to_string(), glob))
                    .map_err(|err| SiteError::Pattern { pattern: pattern.to_string(), message: err.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { globs })
    }

    /// First pattern matching `relative`, if any.
    pub fn matching_pattern(&self, relative: &Path) -> Option<&str> {
        self.globs
            .iter()
            .find(|(_, glob)| glob.is_match(relative))
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn matches(&self, relative: &Path) -> bool {
        self.matching_pattern(relative).is_some()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.globs.iter().map(|(pattern, _)| pattern.as_str())
    }
}

/// Copy `input_root/relative` to `output_root/relative`, creating parents.
pub fn copy_file(input_root: &Path, output_root: &Path, relative: &Path) -> Result<u64, SiteError> {
    let from = input_root.join(relative);
    let to = output_root.join(relative);
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).map_err(SiteError::io(parent))?;
    }
    std::fs::copy(&from, &to).map_err(SiteError::io(&from))
}

#[cfg(test)]
#[path = "passthrough_test.rs"]
mod tests;
