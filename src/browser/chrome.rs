use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use tracing::{info, instrument};
use url::Url;

use super::{Frame, RenderError, Renderer};
use crate::config::Settings;

/// Long enough to outlive an operator solving the challenge by hand.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(60 * 60);

static FRAMES_SCRIPT: &str = r#"JSON.stringify(Array.from(document.querySelectorAll('iframe, frame')).map(f => ({
    src: f.getAttribute('src'),
    name: f.getAttribute('name')
})))"#;

#[derive(Debug, Clone, Default)]
pub struct BrowserOptions {
    pub headless: bool,
    pub spoof_user_agent: bool,
    pub user_data_dir: Option<PathBuf>,
}

impl From<&Settings> for BrowserOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            headless: settings.headless,
            spoof_user_agent: settings.spoof_user_agent,
            user_data_dir: settings.user_data_dir.clone(),
        }
    }
}

/// A single Chrome tab. Dropping it shuts the browser down.
pub struct ChromeRenderer {
    // Kept alive for the tab; the process is killed on drop.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeRenderer {
    #[instrument(skip_all)]
    pub fn launch(options: &BrowserOptions) -> Result<Self, RenderError> {
        let mut args: Vec<OsString> = vec![
            OsString::from("--disable-dev-shm-usage"),
            OsString::from("--no-first-run"),
            OsString::from("--no-default-browser-check"),
            OsString::from("--disable-blink-features=AutomationControlled"),
        ];
        if options.headless {
            args.push(OsString::from("--headless=new"));
        }

        let launch_options = LaunchOptionsBuilder::default()
            .headless(options.headless)
            .window_size(Some((1280, 960)))
            .user_data_dir(options.user_data_dir.clone())
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .args(args.iter().map(|s| s.as_os_str()).collect::<Vec<&OsStr>>())
            .build()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let browser = Browser::new(launch_options).map_err(|e| RenderError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(format!("could not open a tab: {}", e)))?;

        if options.spoof_user_agent {
            tab.set_user_agent(&ua_generator::ua::spoof_ua(), None, None)
                .map_err(|e| RenderError::Launch(format!("could not set user agent: {}", e)))?;
        }

        info!("browser session started");
        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn evaluate(&self, script: &str) -> Result<Option<serde_json::Value>, RenderError> {
        self.tab
            .evaluate(script, false)
            .map(|remote| remote.value)
            .map_err(|e| RenderError::Script(e.to_string()))
    }
}

impl Renderer for ChromeRenderer {
    async fn navigate(&self, url: &Url) -> Result<(), RenderError> {
        let navigation_error = |e: anyhow::Error| RenderError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };

        self.tab.navigate_to(url.as_str()).map_err(navigation_error)?;
        self.tab.wait_until_navigated().map_err(navigation_error)?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, RenderError> {
        self.tab
            .get_content()
            .map_err(|e| RenderError::Script(e.to_string()))
    }

    async fn title(&self) -> Result<String, RenderError> {
        self.tab
            .get_title()
            .map_err(|e| RenderError::Script(e.to_string()))
    }

    async fn count(&self, selector: &str) -> Result<usize, RenderError> {
        let quoted = serde_json::to_string(selector).map_err(|e| RenderError::Script(e.to_string()))?;
        let script = format!("document.querySelectorAll({}).length", quoted);

        let count = self
            .evaluate(&script)?
            .and_then(|v| v.as_u64())
            .ok_or_else(|| RenderError::Script(format!("no element count for {}", selector)))?;
        Ok(count as usize)
    }

    async fn screenshot_png(&self) -> Result<Vec<u8>, RenderError> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| RenderError::Screenshot(e.to_string()))
    }

    async fn frames(&self) -> Result<Vec<Frame>, RenderError> {
        let json = self
            .evaluate(FRAMES_SCRIPT)?
            .and_then(|v| v.as_str().map(str::to_owned))
            .ok_or_else(|| RenderError::Script("frame listing returned nothing".to_owned()))?;

        serde_json::from_str(&json).map_err(|e| RenderError::Script(e.to_string()))
    }

    // Evaluation always targets the tab's main frame, so there is no frame context to leave.
    async fn reset_to_top_level(&self) -> Result<(), RenderError> {
        Ok(())
    }
}

impl Drop for ChromeRenderer {
    fn drop(&mut self) {
        info!("closing browser session");
    }
}
