use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, instrument};

use crate::chapter::ChapterResult;

pub static DEBUG_SCREENSHOT: &str = "debug_screenshot.png";
pub static DEBUG_PAGE_SOURCE: &str = "debug_page_source.html";

/// Writes everything a run produces under one output directory.
#[derive(Clone)]
pub struct Processor {
    output_dir: PathBuf,
}

impl Processor {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("could not create {}", self.output_dir.display()))
    }

    #[instrument(skip_all, fields(chapter = %result.chapter))]
    pub async fn write_chapter(&self, result: &ChapterResult) -> Result<PathBuf> {
        let path = self.output_dir.join(result.chapter.filename());
        fs::write(&path, result.contents())
            .await
            .with_context(|| format!("could not write {}", path.display()))?;

        info!("chapter saved to {}", path.display());
        Ok(path)
    }

    pub async fn write_screenshot(&self, png: &[u8]) -> Result<PathBuf> {
        let path = self.output_dir.join(DEBUG_SCREENSHOT);
        fs::write(&path, png)
            .await
            .with_context(|| format!("could not write {}", path.display()))?;

        info!("debug screenshot saved to {}", path.display());
        Ok(path)
    }

    pub async fn write_page_source(&self, html: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(DEBUG_PAGE_SOURCE);
        fs::write(&path, html)
            .await
            .with_context(|| format!("could not write {}", path.display()))?;

        info!("debug page source saved to {}", path.display());
        Ok(path)
    }
}
