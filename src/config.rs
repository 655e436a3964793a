use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use url::Url;

static CONFIG_FILE: &str = "config";
static ENV_PREFIX: &str = "NOVEL_FETCH";

static DEFAULT_LISTING_URL: &str = "https://booktoki468.com/novel/14323569?stx=%EB%AC%B4%ED%95%9C&book=%EC%9D%BC%EB%B0%98%EC%86%8C%EC%84%A4";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_listing_url")]
    pub listing_url: Url,
    #[serde(default = "default_challenge_wait_secs")]
    pub challenge_wait_secs: u64,
    #[serde(default = "default_post_challenge_wait_secs")]
    pub post_challenge_wait_secs: u64,
    #[serde(default = "default_content_wait_timeout_secs")]
    pub content_wait_timeout_secs: u64,
    #[serde(default = "default_frame_wait_timeout_secs")]
    pub frame_wait_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_chapter_link_selector")]
    pub chapter_link_selector: String,
    #[serde(default = "default_content_selector")]
    pub content_selector: String,
    /// The challenge has to be solved by hand, so the window is visible unless asked otherwise.
    #[serde(default)]
    pub headless: bool,
    #[serde(default)]
    pub spoof_user_agent: bool,
    pub user_data_dir: Option<PathBuf>,
}

fn default_listing_url() -> Url {
    Url::parse(DEFAULT_LISTING_URL).expect("built-in listing url is valid")
}

fn default_challenge_wait_secs() -> u64 {
    15
}

fn default_post_challenge_wait_secs() -> u64 {
    5
}

fn default_content_wait_timeout_secs() -> u64 {
    10
}

fn default_frame_wait_timeout_secs() -> u64 {
    7
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_chapter_link_selector() -> String {
    ".list-item a".to_owned()
}

fn default_content_selector() -> String {
    "#novel_content".to_owned()
}

/// Loads `config.toml` (optional) and `NOVEL_FETCH_*` environment overrides.
pub fn init_settings() -> Result<Settings> {
    config::Config::builder()
        .add_source(
            config::File::with_name(CONFIG_FILE)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize()
        .map_err(|e| anyhow::anyhow!("failed to deserialize settings: {}", e))
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("failed to deserialize settings: {}", e))
    }

    pub fn timings(&self) -> Timings {
        Timings {
            challenge_wait: Duration::from_secs(self.challenge_wait_secs),
            post_challenge_wait: Duration::from_secs(self.post_challenge_wait_secs),
            content_wait: Duration::from_secs(self.content_wait_timeout_secs),
            frame_wait: Duration::from_secs(self.frame_wait_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
        }
    }
}

/// Bounds for every wait-for-condition step in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub challenge_wait: Duration,
    pub post_challenge_wait: Duration,
    pub content_wait: Duration,
    pub frame_wait: Duration,
    pub poll_interval: Duration,
}
