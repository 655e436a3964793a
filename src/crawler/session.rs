use anyhow::{Context, Result};
use tracing::{info, instrument, warn};
use url::Url;

use crate::browser::{Renderer, wait_for};
use crate::challenge::{ChallengeGate, looks_like_challenge};
use crate::config::Timings;
use crate::crawler::downloader::locate_frames;
use crate::crawler::{Processor, RenderedPage};

/// Gets the listing page past the anti-bot challenge.
pub struct Session<'a, R, G> {
    renderer: &'a R,
    gate: &'a G,
    processor: &'a Processor,
    link_selector: &'a str,
    timings: Timings,
}

impl<'a, R: Renderer, G: ChallengeGate> Session<'a, R, G> {
    pub fn new(
        renderer: &'a R,
        gate: &'a G,
        processor: &'a Processor,
        link_selector: &'a str,
        timings: Timings,
    ) -> Self {
        Self {
            renderer,
            gate,
            processor,
            link_selector,
            timings,
        }
    }

    /// Loads the listing, snapshots it, waits on the operator and returns the rendered page.
    ///
    /// Only a failed navigation or a failed gate is an error.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn open_listing(&self, url: &Url) -> Result<RenderedPage> {
        let renderer = self.renderer;

        info!("opening listing page");
        renderer
            .navigate(url)
            .await
            .context("could not load the listing page")?;

        let cleared = wait_for(
            "challenge to clear",
            self.timings.challenge_wait,
            self.timings.poll_interval,
            || async move { renderer.title().await.map(|t| !looks_like_challenge(&t)) },
        )
        .await;
        if let Err(e) = cleared {
            warn!("challenge still showing: {}", e);
        }

        self.save_snapshot().await;

        let frames = locate_frames(renderer, self.timings.frame_wait, self.timings.poll_interval).await;
        for frame in &frames {
            info!(
                "frame on listing page: src={} name={}",
                frame.src.as_deref().unwrap_or("-"),
                frame.name.as_deref().unwrap_or("-")
            );
        }

        self.await_manual_challenge_resolution().await?;

        let selector = self.link_selector;
        let listed = wait_for(
            "chapter links",
            self.timings.post_challenge_wait,
            self.timings.poll_interval,
            || async move { renderer.count(selector).await.map(|n| n > 0) },
        )
        .await;
        if let Err(e) = listed {
            warn!("listing shows no chapter links yet: {}", e);
        }

        let html = renderer
            .page_source()
            .await
            .context("could not read the listing page")?;
        Ok(RenderedPage {
            url: url.clone(),
            html,
        })
    }

    pub async fn await_manual_challenge_resolution(&self) -> Result<()> {
        info!("waiting for the challenge to be solved by hand");
        self.gate.wait().await.context("manual challenge gate failed")?;
        info!("resuming");
        Ok(())
    }

    // Debug artifacts are best effort.
    async fn save_snapshot(&self) {
        match self.renderer.screenshot_png().await {
            Ok(png) => {
                if let Err(e) = self.processor.write_screenshot(&png).await {
                    warn!("{:#}", e);
                }
            }
            Err(e) => warn!("could not capture screenshot: {}", e),
        }

        match self.renderer.page_source().await {
            Ok(html) => {
                if let Err(e) = self.processor.write_page_source(&html).await {
                    warn!("{:#}", e);
                }
            }
            Err(e) => warn!("could not capture page source: {}", e),
        }
    }
}
