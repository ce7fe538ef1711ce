//! One-pass site build.
//!
//! DESIGN
//! ======
//! A build is a plan followed by its execution. [`SiteBuilder::plan`] walks
//! the input tree once and classifies every file:
//! - passthrough glob match: copied verbatim (takes precedence);
//! - `.md` / `.html`: rendered page, output path from `permalink` or from
//!   the source path (`a/b.md` -> `a/b/index.html`, `a/index.md` ->
//!   `a/index.html`);
//! - anything else: skipped.
//!
//! The includes directory, dot-files, and the output directory (when it
//! lives inside the input tree) are never walked.
//!
//! Every output path is claimed once: pages, passthrough copies, and the
//! highlight stylesheet may not overwrite each other, and a `permalink`
//! may not climb out of the output directory.
//!
//! There is no incremental state: every `build` re-renders every page.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use walkdir::{DirEntry, WalkDir};

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::filters;
use crate::frontmatter::{self, FrontMatter};
use crate::highlight::{self, Highlighter};
use crate::markdown::MarkdownRenderer;
use crate::passthrough::{self, Passthrough};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Markdown,
    Html,
}

impl PageKind {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("md") {
            Some(Self::Markdown)
        } else if ext.eq_ignore_ascii_case("html") {
            Some(Self::Html)
        } else {
            None
        }
    }
}

/// A page scheduled for rendering. Paths are relative to the input and
/// output directories respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    pub kind: PageKind,
    pub source: PathBuf,
    pub output: PathBuf,
    pub url: String,
    pub front_matter: FrontMatter,
    /// Source text after the front matter block.
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub pages: Vec<PlannedPage>,
    pub passthrough: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub passthrough: usize,
    pub skipped: usize,
    pub stylesheet: bool,
}

#[derive(Serialize)]
struct SiteContext<'a> {
    title: &'a str,
    base_url: &'a str,
}

#[derive(Serialize)]
struct PageContext<'a> {
    url: &'a str,
    input_path: String,
    output_path: String,
    title: Option<&'a str>,
}

pub struct SiteBuilder {
    config: SiteConfig,
    renderer: MarkdownRenderer,
    passthrough: Passthrough,
    templates: Tera,
}

impl SiteBuilder {
    /// Compile passthrough globs, load layouts, and register filters and
    /// markdown hooks for `config`.
    pub fn new(config: SiteConfig) -> Result<Self, SiteError> {
        let passthrough = Passthrough::new(&config.passthrough)?;
        let mut renderer = MarkdownRenderer::new(config.markdown);
        if config.highlight.enabled {
            renderer = renderer.with_highlighter(Highlighter::new());
        }
        let templates = load_templates(&config.includes_path())?;
        Ok(Self { config, renderer, passthrough, templates })
    }

    /// Classify the input tree without writing anything.
    pub fn plan(&self) -> Result<BuildPlan, SiteError> {
        let input = &self.config.input_dir;
        let output_canonical = match std::fs::canonicalize(&self.config.output_dir) {
            Ok(path) => Some(path),
            Err(_) => None,
        };

        let mut plan = BuildPlan::default();
        let mut outputs: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
        if self.config.highlight.enabled {
            let stylesheet = self.config.highlight.stylesheet.clone();
            claim_output(&mut outputs, stylesheet.clone(), stylesheet)?;
        }

        let walker = WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry, output_canonical.as_deref()));

        for entry in walker {
            let entry = entry.map_err(|err| SiteError::Walk { path: input.clone(), message: err.to_string() })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = relative_to(entry.path(), input)?;

            if self.passthrough.matches(&relative) {
                claim_output(&mut outputs, relative.clone(), relative.clone())?;
                plan.passthrough.push(relative);
                continue;
            }

            let Some(kind) = PageKind::from_path(&relative) else {
                tracing::debug!(path = %relative.display(), "no handler for file, skipping");
                plan.skipped.push(relative);
                continue;
            };

            let raw = std::fs::read_to_string(entry.path()).map_err(SiteError::io(entry.path()))?;
            let page = frontmatter::parse(&raw, entry.path())?;
            let (output, url) = output_for(&relative, page.front_matter.permalink.as_deref())?;

            claim_output(&mut outputs, output.clone(), relative.clone())?;
            plan.pages.push(PlannedPage {
                kind,
                source: relative,
                output,
                url,
                front_matter: page.front_matter,
                body: page.body.to_string(),
            });
        }

        Ok(plan)
    }

    /// Render every page, copy passthrough files, and write the highlight
    /// stylesheet.
    pub fn build(&mut self) -> Result<BuildReport, SiteError> {
        let plan = self.plan()?;
        let output = self.config.output_dir.clone();
        std::fs::create_dir_all(&output).map_err(SiteError::io(&output))?;

        for page in &plan.pages {
            self.render_page(page)?;
        }

        for relative in &plan.passthrough {
            passthrough::copy_file(&self.config.input_dir, &output, relative)?;
        }
        if plan.passthrough.is_empty() {
            tracing::debug!(patterns = ?self.passthrough.patterns().collect::<Vec<_>>(), "no passthrough matches");
        }

        let stylesheet = if self.config.highlight.enabled {
            let css = highlight::stylesheet(&self.config.highlight.light_theme, &self.config.highlight.dark_theme)?;
            write_output(&output.join(&self.config.highlight.stylesheet), &css)?;
            true
        } else {
            false
        };

        let report = BuildReport {
            pages: plan.pages.len(),
            passthrough: plan.passthrough.len(),
            skipped: plan.skipped.len(),
            stylesheet,
        };
        tracing::info!(
            pages = report.pages,
            passthrough = report.passthrough,
            skipped = report.skipped,
            output = %output.display(),
            "site built"
        );
        Ok(report)
    }

    fn render_page(&mut self, page: &PlannedPage) -> Result<(), SiteError> {
        let mut context = self.context_for(page);

        let content = match page.kind {
            PageKind::Markdown => self.renderer.render(&page.body)?,
            PageKind::Html => self
                .templates
                .render_str(&page.body, &context)
                .map_err(|err| SiteError::template(&page.source.display().to_string(), &err))?,
        };

        let html = match page.front_matter.layout.as_deref() {
            Some(layout) => {
                context.insert("content", &content);
                self.templates.render(layout, &context).map_err(|err| SiteError::template(layout, &err))?
            }
            None => content,
        };

        write_output(&self.config.output_dir.join(&page.output), &html)?;
        tracing::debug!(source = %page.source.display(), output = %page.output.display(), "page rendered");
        Ok(())
    }

    fn context_for(&self, page: &PlannedPage) -> Context {
        let front_matter = &page.front_matter;
        let mut context = Context::new();
        for (key, value) in &front_matter.extra {
            context.insert(key.as_str(), value);
        }
        if let Some(title) = &front_matter.title {
            context.insert("title", title);
        }
        context.insert("site", &SiteContext { title: &self.config.title, base_url: &self.config.base_url });
        context.insert(
            "page",
            &PageContext {
                url: &page.url,
                input_path: url_path(&page.source),
                output_path: url_path(&page.output),
                title: front_matter.title.as_deref(),
            },
        );
        context
    }

    fn is_excluded(&self, entry: &DirEntry, output_canonical: Option<&Path>) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            return true;
        }
        if !entry.file_type().is_dir() {
            return false;
        }
        if entry.path().strip_prefix(&self.config.input_dir).is_ok_and(|rel| rel == self.config.includes_dir) {
            return true;
        }
        match (output_canonical, std::fs::canonicalize(entry.path())) {
            (Some(output), Ok(dir)) => dir == output,
            _ => false,
        }
    }
}

/// Map a page source to its output file and public URL.
///
/// A permalink must stay inside the output directory: `..` segments are
/// rejected rather than normalized.
pub fn output_for(relative: &Path, permalink: Option<&str>) -> Result<(PathBuf, String), SiteError> {
    if let Some(link) = permalink {
        let trimmed = link.trim_start_matches('/');
        let escapes =
            Path::new(trimmed).components().any(|part| !matches!(part, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SiteError::InvalidPermalink { page: relative.to_path_buf(), permalink: link.to_string() });
        }
        if trimmed.is_empty() || trimmed.ends_with('/') {
            return Ok((PathBuf::from(trimmed).join("index.html"), format!("/{trimmed}")));
        }
        return Ok((PathBuf::from(trimmed), format!("/{trimmed}")));
    }

    let stem = relative.with_extension("");
    let dir = if relative.file_stem().is_some_and(|name| name == "index") {
        stem.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        stem
    };

    let path = url_path(&dir);
    let url = if path.is_empty() { "/".to_string() } else { format!("/{path}/") };
    Ok((dir.join("index.html"), url))
}

/// Record that `source` writes `output`; a second claim is a collision.
fn claim_output(outputs: &mut BTreeMap<PathBuf, PathBuf>, output: PathBuf, source: PathBuf) -> Result<(), SiteError> {
    match outputs.get(&output) {
        Some(first) => Err(SiteError::OutputCollision { first: first.clone(), second: source, output }),
        None => {
            outputs.insert(output, source);
            Ok(())
        }
    }
}

fn url_path(path: &Path) -> String {
    path.iter().map(|part| part.to_string_lossy()).collect::<Vec<_>>().join("/")
}

fn relative_to(path: &Path, root: &Path) -> Result<PathBuf, SiteError> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|err| SiteError::Walk { path: path.to_path_buf(), message: err.to_string() })
}

fn write_output(path: &Path, contents: &str) -> Result<(), SiteError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(SiteError::io(parent))?;
    }
    std::fs::write(path, contents).map_err(SiteError::io(path))
}

fn load_templates(dir: &Path) -> Result<Tera, SiteError> {
    let mut tera = Tera::default();
    filters::register(&mut tera);

    if !dir.is_dir() {
        tracing::debug!(path = %dir.display(), "no includes directory, pages render without layouts");
        return Ok(tera);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| SiteError::Walk { path: dir.to_path_buf(), message: err.to_string() })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = url_path(&relative_to(entry.path(), dir)?);
        files.push((entry.path().to_path_buf(), Some(name)));
    }

    tracing::debug!(path = %dir.display(), templates = files.len(), "loading layouts");
    tera.add_template_files(files).map_err(|err| SiteError::template(&dir.display().to_string(), &err))?;
    Ok(tera)
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
