//! Build-time syntax highlighting for fenced code blocks.
//!
//! DESIGN
//! ======
//! syntect emits class-based spans rather than inline colors, so a single
//! generated stylesheet can follow the page theme: light rules apply by
//! default, dark rules apply under `[data-theme="dark"]` and, while no
//! theme attribute is set, under `prefers-color-scheme: dark`.

use pulldown_cmark_escape::{escape_html, escape_html_body_text};
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::SiteError;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };
const DARK_SCOPE: &str = "[data-theme=\"dark\"]";
const AUTO_DARK_SCOPE: &str = ":root:not([data-theme])";

pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self { syntaxes: SyntaxSet::load_defaults_newlines() }
    }

    /// Render one code block as `<pre class="language-X"><code class="language-X">`.
    ///
    /// Unknown languages keep the wrapper and fall back to escaped text.
    pub fn highlight_block(&self, language: &str, code: &str) -> Result<String, SiteError> {
        let mut class = String::from("language-");
        escape_html(&mut class, language)?;
        let body = match self.syntaxes.find_syntax_by_token(language) {
            Some(syntax) => {
                let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
                for line in LinesWithEndings::from(code) {
                    generator
                        .parse_html_for_line_which_includes_newline(line)
                        .map_err(|err| SiteError::Highlight(format!("{language}: {err}")))?;
                }
                generator.finalize()
            }
            None => {
                tracing::debug!(language, "no syntax definition, emitting plain code block");
                let mut body = String::with_capacity(code.len());
                escape_html_body_text(&mut body, code)?;
                body
            }
        };
        Ok(format!("<pre class=\"{class}\"><code class=\"{class}\">{body}</code></pre>\n"))
    }
}

/// Token stylesheet covering both page themes.
pub fn stylesheet(light_theme: &str, dark_theme: &str) -> Result<String, SiteError> {
    let themes = ThemeSet::load_defaults();
    let css_for = |name: &str| -> Result<String, SiteError> {
        let theme = themes
            .themes
            .get(name)
            .ok_or_else(|| SiteError::Highlight(format!("unknown highlight theme `{name}`")))?;
        css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|err| SiteError::Highlight(err.to_string()))
    };

    let light = css_for(light_theme)?;
    let dark = css_for(dark_theme)?;

    let mut css = String::with_capacity(light.len() + dark.len() * 2 + 64);
    css.push_str(&light);
    css.push('\n');
    css.push_str(&scope_css(&dark, DARK_SCOPE));
    css.push_str("\n@media (prefers-color-scheme: dark) {\n");
    css.push_str(&scope_css(&dark, AUTO_DARK_SCOPE));
    css.push_str("}\n");
    Ok(css)
}

/// Prefix every selector of `css` with `scope`.
///
/// Only handles flat rule lists, which is what syntect generates.
fn scope_css(css: &str, scope: &str) -> String {
    let mut out = String::with_capacity(css.len() * 2);
    for line in css.lines() {
        match line.trim_end().strip_suffix('{') {
            Some(selectors) if !line.trim_start().starts_with('@') => {
                let scoped: Vec<String> = selectors
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| format!("{scope} {s}"))
                    .collect();
                out.push_str(&scoped.join(", "));
                out.push_str(" {");
            }
            _ => out.push_str(line),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "highlight_test.rs"]
mod tests;
