pub mod downloader;
pub mod parser;
pub mod processor;
pub mod session;

pub use downloader::{Downloader, locate_frames};
pub use parser::Parser;
pub use processor::Processor;
pub use session::Session;

use anyhow::Result;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::browser::Renderer;
use crate::challenge::ChallengeGate;
use crate::config::{Settings, Timings};

/// Rendered HTML of one URL at one moment.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub url: Url,
    pub html: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub write_errors: usize,
}

/// Owns the browser for the whole run; dropping the crawler ends the session.
pub struct NovelCrawler<R, G> {
    renderer: R,
    gate: G,
    parser: Parser,
    processor: Processor,
    listing_url: Url,
    link_selector: String,
    content_selector: String,
    timings: Timings,
}

impl<R: Renderer, G: ChallengeGate> NovelCrawler<R, G> {
    pub fn new(settings: &Settings, renderer: R, gate: G) -> Result<Self> {
        Ok(Self {
            renderer,
            gate,
            parser: Parser::new(&settings.chapter_link_selector, &settings.content_selector)?,
            processor: Processor::new(settings.output_dir.clone()),
            listing_url: settings.listing_url.clone(),
            link_selector: settings.chapter_link_selector.clone(),
            content_selector: settings.content_selector.clone(),
            timings: settings.timings(),
        })
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    #[instrument(skip_all, fields(listing = %self.listing_url))]
    pub async fn run(&self) -> Result<RunSummary> {
        self.processor.prepare().await?;

        let session = Session::new(
            &self.renderer,
            &self.gate,
            &self.processor,
            &self.link_selector,
            self.timings,
        );
        let listing = session.open_listing(&self.listing_url).await?;

        let chapters = self.parser.chapter_refs(&listing);
        let mut summary = RunSummary {
            discovered: chapters.len(),
            ..Default::default()
        };
        if chapters.is_empty() {
            warn!("no chapter links found on the listing page");
            return Ok(summary);
        }
        info!("found {} chapter links", chapters.len());

        let downloader = Downloader::new(
            &self.renderer,
            &self.parser,
            &self.content_selector,
            self.timings,
        );
        for chapter in &chapters {
            info!("fetching chapter {}: {}", chapter, chapter.url);
            let result = downloader.chapter(chapter).await;
            if result.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }

            if let Err(e) = self.processor.write_chapter(&result).await {
                error!("{:#}", e);
                summary.write_errors += 1;
            }
        }

        info!(
            "{} chapters: {} fetched, {} failed, {} not written",
            summary.discovered, summary.succeeded, summary.failed, summary.write_errors
        );
        Ok(summary)
    }
}
