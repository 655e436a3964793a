#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use novel_fetch::{Frame, RenderError, Renderer, Timings};
use scraper::{Html, Selector};
use url::Url;

/// A page as the browser would render it, optionally changing after some reads.
#[derive(Clone)]
pub struct FakePage {
    pub title: String,
    pub html: String,
    pub later: Option<(usize, String, String)>,
}

impl FakePage {
    pub fn new(title: &str, html: &str) -> Self {
        Self {
            title: title.to_owned(),
            html: html.to_owned(),
            later: None,
        }
    }

    /// After `reads` title/count probes the page turns into `title`/`html`.
    pub fn then(mut self, reads: usize, title: &str, html: &str) -> Self {
        self.later = Some((reads, title.to_owned(), html.to_owned()));
        self
    }
}

/// In-memory renderer serving fixed pages by URL.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, FakePage>,
    current: RefCell<Option<String>>,
    reads: Cell<usize>,
    pub visits: Rc<RefCell<Vec<String>>>,
    pub resets: Cell<usize>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_owned(), page);
        self
    }

    fn view(&self) -> Result<(String, String), RenderError> {
        let current = self.current.borrow();
        let url = current
            .as_ref()
            .ok_or_else(|| RenderError::Script("nothing loaded".to_owned()))?;
        let page = &self.pages[url];
        match &page.later {
            Some((reads, title, html)) if self.reads.get() >= *reads => {
                Ok((title.clone(), html.clone()))
            }
            _ => Ok((page.title.clone(), page.html.clone())),
        }
    }

    fn probe(&self) -> Result<(String, String), RenderError> {
        let view = self.view();
        self.reads.set(self.reads.get() + 1);
        view
    }
}

impl Renderer for FakeSite {
    async fn navigate(&self, url: &Url) -> Result<(), RenderError> {
        self.visits.borrow_mut().push(url.to_string());
        if !self.pages.contains_key(url.as_str()) {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_owned(),
            });
        }
        *self.current.borrow_mut() = Some(url.to_string());
        self.reads.set(0);
        Ok(())
    }

    async fn page_source(&self) -> Result<String, RenderError> {
        self.view().map(|(_, html)| html)
    }

    async fn title(&self) -> Result<String, RenderError> {
        self.probe().map(|(title, _)| title)
    }

    async fn count(&self, selector: &str) -> Result<usize, RenderError> {
        let (_, html) = self.probe()?;
        let selector = Selector::parse(selector).map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(Html::parse_document(&html).select(&selector).count())
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>, RenderError> {
        self.view()?;
        Ok(vec![137, 80, 78, 71])
    }

    async fn frames(&self) -> Result<Vec<Frame>, RenderError> {
        let (_, html) = self.view()?;
        let selector = Selector::parse("iframe, frame").unwrap();
        Ok(Html::parse_document(&html)
            .select(&selector)
            .map(|f| Frame {
                src: f.value().attr("src").map(str::to_owned),
                name: f.value().attr("name").map(str::to_owned),
            })
            .collect())
    }

    async fn reset_to_top_level(&self) -> Result<(), RenderError> {
        self.resets.set(self.resets.get() + 1);
        Ok(())
    }
}

pub fn fast_timings() -> Timings {
    Timings {
        challenge_wait: Duration::from_millis(50),
        post_challenge_wait: Duration::from_millis(50),
        content_wait: Duration::from_millis(50),
        frame_wait: Duration::from_millis(20),
        poll_interval: Duration::from_millis(5),
    }
}

pub static LISTING_URL: &str = "https://site.com/novel/x";

pub fn listing_html() -> String {
    r#"<html><head><title>무한</title></head><body><ul>
        <li class="list-item"><a href="/c/1">1화</a></li>
        <li class="list-item"><a href="/c/2">2화</a></li>
        <li class="list-item"><a href="https://site.com/c/3">3화</a></li>
    </ul></body></html>"#
        .to_owned()
}

pub fn chapter_html(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    format!(
        "<html><body><div id=\"novel_content\">{}</div></body></html>",
        body
    )
}
