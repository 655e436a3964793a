pub mod chrome;

pub use chrome::ChromeRenderer;

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("screenshot failed: {0}")]
    Screenshot(String),
}

/// A frame element present in the top-level document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Frame {
    pub src: Option<String>,
    pub name: Option<String>,
}

/// A browser tab that renders pages, JavaScript included.
///
/// Every read reflects the live DOM at call time; nothing is cached between calls.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn navigate(&self, url: &Url) -> Result<(), RenderError>;

    /// Serialized DOM of the current page.
    async fn page_source(&self) -> Result<String, RenderError>;

    async fn title(&self) -> Result<String, RenderError>;

    /// Number of elements currently matching a CSS selector.
    async fn count(&self, selector: &str) -> Result<usize, RenderError>;

    async fn screenshot_png(&self) -> Result<Vec<u8>, RenderError>;

    /// Frame elements of the top-level document.
    async fn frames(&self) -> Result<Vec<Frame>, RenderError>;

    /// Leaves any frame context so later queries hit the top-level document.
    async fn reset_to_top_level(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Polls `probe` every `interval` until it reports true or `timeout` passes.
///
/// A probe error counts as "not yet": pages are often mid-navigation while we poll.
pub async fn wait_for<F, Fut>(
    what: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<(), RenderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, RenderError>>,
{
    let poll = async {
        loop {
            match probe().await {
                Ok(true) => return,
                Ok(false) => {}
                Err(e) => debug!("probe for {} failed: {}", what, e),
            }
            tokio::time::sleep(interval).await;
        }
    };

    tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| RenderError::Timeout {
            what: what.to_owned(),
            timeout,
        })
}
