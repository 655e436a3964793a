pub mod browser;
pub mod challenge;
pub mod chapter;
pub mod config;
pub mod crawler;
pub mod logger;
pub mod utils;

pub use browser::{ChromeRenderer, Frame, RenderError, Renderer};
pub use challenge::{ChallengeGate, ConsoleGate};
pub use chapter::{ChapterRef, ChapterResult, Outcome};
pub use config::{Settings, Timings};
pub use crawler::{NovelCrawler, RenderedPage, RunSummary};
