use std::time::Instant;

use anyhow::Result;
use tracing::{error, info};

use novel_fetch::browser::chrome::BrowserOptions;
use novel_fetch::utils::display_elapsed_time;
use novel_fetch::{ChromeRenderer, ConsoleGate, NovelCrawler, config, logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logger::init();

    let settings = config::init_settings()?;
    info!("listing: {}", settings.listing_url);

    let renderer = ChromeRenderer::launch(&BrowserOptions::from(&settings))?;
    let crawler = NovelCrawler::new(&settings, renderer, ConsoleGate)?;

    let start = Instant::now();
    let result = crawler.run().await;
    drop(crawler);

    match result {
        Ok(_) => {
            display_elapsed_time(start.elapsed());
            Ok(())
        }
        Err(e) => {
            error!("run aborted: {:#}", e);
            Err(e)
        }
    }
}
