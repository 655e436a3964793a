use anyhow::Result;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{info, instrument, warn};

use crate::chapter::ChapterRef;
use crate::crawler::RenderedPage;
use crate::utils::collapse_whitespace;

/// Elements that start a line of their own in extracted text.
static BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure",
    "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

static SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone)]
pub struct Parser {
    link_selector: Selector,
    content_selector: Selector,
}

impl Parser {
    pub fn new(link_selector: &str, content_selector: &str) -> Result<Self> {
        Ok(Self {
            link_selector: parse_selector(link_selector)?,
            content_selector: parse_selector(content_selector)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow::anyhow!("invalid selector '{}': {}", selector, e))
}

impl Parser {
    /// Chapter links of a listing page in document order, resolved against the page URL.
    #[instrument(skip_all, fields(url = %listing.url))]
    pub fn chapter_refs(&self, listing: &RenderedPage) -> Vec<ChapterRef> {
        let document = Html::parse_document(&listing.html);
        let mut chapters = Vec::new();

        for (index, link) in document.select(&self.link_selector).enumerate() {
            let position = index + 1;
            let title = link.text().collect::<String>().trim().to_owned();

            let Some(href) = link.value().attr("href") else {
                warn!("no link for chapter {} ({})", position, title);
                continue;
            };

            let url = match listing.url.join(href) {
                Ok(url) => url,
                Err(e) => {
                    warn!("chapter {} ({}) has an unusable link '{}': {}", position, title, href, e);
                    continue;
                }
            };

            info!("chapter {} ({}) link: {}", position, title, url);
            chapters.push(ChapterRef::new(position, title, url));
        }
        chapters
    }

    /// Visible text of the content element, one line per block, or `None` when it is absent.
    pub fn chapter_content(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let content = document.select(&self.content_selector).next()?;
        Some(block_text(content))
    }
}

fn block_text(element: ElementRef) -> String {
    let mut lines = Vec::new();
    let mut line = String::new();
    push_lines(element, &mut line, &mut lines);
    flush_line(&mut line, &mut lines);
    lines.join("\n")
}

fn push_lines(element: ElementRef, line: &mut String, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => line.push_str(text),
            Node::Element(elem) => {
                let name = elem.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    flush_line(line, lines);
                    continue;
                }
                let Some(child_elem) = ElementRef::wrap(child) else {
                    continue;
                };

                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    flush_line(line, lines);
                }
                push_lines(child_elem, line, lines);
                if is_block {
                    flush_line(line, lines);
                }
            }
            _ => (),
        }
    }
}

// Source newlines inside text nodes are line boundaries too.
fn flush_line(line: &mut String, lines: &mut Vec<String>) {
    for source_line in line.split('\n') {
        let text = collapse_whitespace(source_line);
        if !text.is_empty() {
            lines.push(text);
        }
    }
    line.clear();
}
