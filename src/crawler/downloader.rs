use std::cell::RefCell;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::browser::{Frame, RenderError, Renderer, wait_for};
use crate::chapter::{CONTENT_NOT_FOUND, ChapterRef, ChapterResult};
use crate::config::Timings;
use crate::crawler::Parser;

/// Renders chapter pages and pulls their text out.
pub struct Downloader<'a, R> {
    renderer: &'a R,
    parser: &'a Parser,
    content_selector: &'a str,
    timings: Timings,
}

impl<'a, R: Renderer> Downloader<'a, R> {
    pub fn new(
        renderer: &'a R,
        parser: &'a Parser,
        content_selector: &'a str,
        timings: Timings,
    ) -> Self {
        Self {
            renderer,
            parser,
            content_selector,
            timings,
        }
    }

    /// Never fails: every problem ends up in the returned result.
    #[instrument(skip_all, fields(chapter = %chapter))]
    pub async fn chapter(&self, chapter: &ChapterRef) -> ChapterResult {
        match self.chapter_text(chapter).await {
            Ok(Some(text)) => {
                info!("chapter content extracted ({} chars)", text.chars().count());
                ChapterResult::success(chapter.clone(), text)
            }
            Ok(None) => {
                warn!("content element disappeared after loading");
                ChapterResult::failure(chapter.clone(), CONTENT_NOT_FOUND)
            }
            Err(e) => {
                warn!("chapter failed: {:#}", e);
                ChapterResult::failure(chapter.clone(), format!("{:#}", e))
            }
        }
    }

    async fn chapter_text(&self, chapter: &ChapterRef) -> Result<Option<String>> {
        let renderer = self.renderer;
        let selector = self.content_selector;

        renderer.navigate(&chapter.url).await?;
        wait_for(
            selector,
            self.timings.content_wait,
            self.timings.poll_interval,
            || async move { renderer.count(selector).await.map(|n| n > 0) },
        )
        .await?;

        let html = renderer
            .page_source()
            .await
            .context("could not read the rendered chapter")?;
        Ok(self.parser.chapter_content(&html))
    }

    pub async fn locate_frames(&self) -> Vec<Frame> {
        locate_frames(self.renderer, self.timings.frame_wait, self.timings.poll_interval).await
    }
}

/// Frames of the top-level document, waiting up to `timeout` for at least one.
///
/// Returns an empty list when none show up in time.
#[instrument(skip(renderer))]
pub async fn locate_frames<R: Renderer>(
    renderer: &R,
    timeout: Duration,
    interval: Duration,
) -> Vec<Frame> {
    if let Err(e) = renderer.reset_to_top_level().await {
        warn!("could not return to the top-level document: {}", e);
    }
    info!("looking for frames in the top-level document");

    let found = RefCell::new(Vec::new());
    let waited = wait_for("frame elements", timeout, interval, || {
        let found = &found;
        async move {
            let frames = renderer.frames().await?;
            let any = !frames.is_empty();
            *found.borrow_mut() = frames;
            Ok::<_, RenderError>(any)
        }
    })
    .await;

    match waited {
        Ok(()) => found.into_inner(),
        Err(e) => {
            info!("no frames found: {}", e);
            Vec::new()
        }
    }
}
