//! Markdown rendering with the site's post-processing hooks.
//!
//! pulldown-cmark does the parsing and HTML emission. This module only
//! rewrites the event stream in between:
//! - links to `http://` / `https://` destinations open in a new browsing
//!   context with `rel="noopener noreferrer"`;
//! - fenced code blocks with a language token go through [`Highlighter`];
//! - raw HTML is escaped into text when the config disallows it.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html::push_html};
use pulldown_cmark_escape::{escape_href, escape_html, escape_html_body_text};

use crate::config::MarkdownConfig;
use crate::error::SiteError;
use crate::highlight::Highlighter;

const EXTERNAL_LINK_ATTRS: &str = " target=\"_blank\" rel=\"noopener noreferrer\"";

pub struct MarkdownRenderer {
    options: Options,
    raw_html: bool,
    external_links: bool,
    highlighter: Option<Highlighter>,
}

struct PendingCode {
    language: String,
    code: String,
}

impl MarkdownRenderer {
    pub fn new(config: MarkdownConfig) -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_HEADING_ATTRIBUTES;
        Self { options, raw_html: config.raw_html, external_links: config.external_links, highlighter: None }
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn render(&self, source: &str) -> Result<String, SiteError> {
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut pending: Option<PendingCode> = None;
        // One entry per open link: true when its opening tag was rewritten.
        let mut links: Vec<bool> = Vec::new();
        let mut image_depth = 0usize;

        for event in Parser::new_ext(source, self.options) {
            if pending.is_some() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some(block) = pending.take() {
                            events.push(self.finish_code_block(&block)?);
                        }
                    }
                    Event::Text(text) => {
                        if let Some(block) = pending.as_mut() {
                            block.code.push_str(&text);
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                event @ Event::Start(Tag::Image { .. }) => {
                    image_depth += 1;
                    events.push(event);
                }
                event @ Event::End(TagEnd::Image) => {
                    image_depth = image_depth.saturating_sub(1);
                    events.push(event);
                }
                // Links inside image alt text are flattened to text by the
                // writer, so they keep their plain start/end pair.
                Event::Start(Tag::Link { dest_url, title, .. })
                    if self.external_links && image_depth == 0 && is_external(&dest_url) =>
                {
                    links.push(true);
                    events.push(Event::Html(CowStr::from(external_link_open(&dest_url, &title)?)));
                }
                event @ Event::Start(Tag::Link { .. }) => {
                    links.push(false);
                    events.push(event);
                }
                Event::End(TagEnd::Link) => {
                    if links.pop() == Some(true) {
                        events.push(Event::Html(CowStr::Borrowed("</a>")));
                    } else {
                        events.push(Event::End(TagEnd::Link));
                    }
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if self.highlighter.is_some() => {
                    let language = language_token(&info);
                    if language.is_empty() {
                        events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                    } else {
                        pending = Some(PendingCode { language: language.to_string(), code: String::new() });
                    }
                }
                // Disallowed HTML is shown as escaped text.
                Event::Html(html) | Event::InlineHtml(html) if !self.raw_html => events.push(Event::Text(html)),
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(source.len() * 2);
        push_html(&mut html, events.into_iter());
        Ok(html)
    }

    fn finish_code_block(&self, block: &PendingCode) -> Result<Event<'static>, SiteError> {
        let html = match &self.highlighter {
            Some(highlighter) => highlighter.highlight_block(&block.language, &block.code)?,
            None => {
                let mut html = String::from("<pre><code>");
                escape_html_body_text(&mut html, &block.code)?;
                html.push_str("</code></pre>\n");
                html
            }
        };
        Ok(Event::Html(CowStr::from(html)))
    }
}

/// True for destinations the browser should open in a new context.
pub fn is_external(dest: &str) -> bool {
    dest.starts_with("http://") || dest.starts_with("https://")
}

/// Opening tag escaped the same way pulldown-cmark escapes its own links.
fn external_link_open(dest: &str, title: &str) -> Result<String, SiteError> {
    let mut tag = String::from("<a href=\"");
    escape_href(&mut tag, dest)?;
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(" title=\"");
        escape_html(&mut tag, title)?;
        tag.push('"');
    }
    tag.push_str(EXTERNAL_LINK_ATTRS);
    tag.push('>');
    Ok(tag)
}

/// First token of a fence info string: "rust,ignore" and "rust title=x" both give "rust".
fn language_token(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',').next().unwrap_or("").trim()
}

#[cfg(test)]
#[path = "markdown_test.rs"]
mod tests;
