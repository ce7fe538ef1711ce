//! # site
//!
//! Build-time wiring for the documentation site. Markdown rendering,
//! templating and syntax highlighting are done by external crates
//! (`pulldown-cmark`, `tera`, `syntect`); this crate registers the site's
//! hooks with them and drives one full build pass over the content tree.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `docsite` binary loads a [`SiteConfig`], hands it to a
//! [`SiteBuilder`], and either writes the output tree (`build`), reports
//! what would be written (`check`), or builds and then serves the result
//! (`serve`).

pub mod build;
pub mod config;
pub mod error;
pub mod filters;
pub mod frontmatter;
pub mod highlight;
pub mod markdown;
pub mod passthrough;

pub use build::{BuildPlan, BuildReport, SiteBuilder};
pub use config::SiteConfig;
pub use error::SiteError;
