//! Build error type shared by every stage of the site pipeline.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};

/// Errors produced while loading configuration or building the site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A file or directory could not be read or written.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The site configuration file is not valid YAML for [`crate::SiteConfig`].
    #[error("config parse failed for {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A page's front matter block could not be parsed.
    #[error("front matter in {} is malformed: {message}", path.display())]
    FrontMatter { path: PathBuf, message: String },

    /// Tera rejected a template or failed to render it.
    #[error("template error in {name}: {message}")]
    Template { name: String, message: String },

    /// A passthrough glob did not compile.
    #[error("invalid passthrough pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// Syntax highlighting or stylesheet generation failed.
    #[error("highlighting failed: {0}")]
    Highlight(String),

    /// Directory traversal failed.
    #[error("walk failed under {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    /// A `permalink` would place the page outside the output directory.
    #[error("permalink `{permalink}` in {} leaves the output directory", page.display())]
    InvalidPermalink { page: PathBuf, permalink: String },

    /// Writing escaped HTML into a buffer failed.
    #[error("html escaping failed: {0}")]
    Escape(#[from] std::fmt::Error),

    /// Two sources render to the same output file.
    #[error("{} and {} both render to {}", first.display(), second.display(), output.display())]
    OutputCollision { first: PathBuf, second: PathBuf, output: PathBuf },
}

impl SiteError {
    /// Stable short code for log lines and exit reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_IO",
            Self::Config { .. } => "E_CONFIG",
            Self::FrontMatter { .. } => "E_FRONT_MATTER",
            Self::Template { .. } => "E_TEMPLATE",
            Self::Pattern { .. } => "E_PATTERN",
            Self::Highlight(_) => "E_HIGHLIGHT",
            Self::Walk { .. } => "E_WALK",
            Self::InvalidPermalink { .. } => "E_INVALID_PERMALINK",
            Self::Escape(_) => "E_ESCAPE",
            Self::OutputCollision { .. } => "E_OUTPUT_COLLISION",
        }
    }

    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io { path: path.to_path_buf(), source }
    }

    /// Flatten a tera error chain; tera keeps the useful detail in `source()`.
    pub(crate) fn template(name: &str, err: &tera::Error) -> Self {
        let mut message = err.to_string();
        let mut cause = StdError::source(err);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = StdError::source(inner);
        }
        Self::Template { name: name.to_string(), message }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
