use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing::debug;

/// Title fragments of anti-bot interstitials, compared lowercase.
static CHALLENGE_TITLES: &[&str] = &[
    "just a moment",
    "attention required",
    "checking your browser",
    "verify you are human",
    "잠시만 기다리십시오",
    "잠시만 기다려 주십시오",
];

pub fn looks_like_challenge(title: &str) -> bool {
    let title = title.to_lowercase();
    CHALLENGE_TITLES.iter().any(|marker| title.contains(marker))
}

/// Suspends the run until someone signals that the challenge is solved.
#[allow(async_fn_in_trait)]
pub trait ChallengeGate {
    async fn wait(&self) -> Result<()>;
}

/// Asks the operator on the console and waits for Enter. Never times out.
pub struct ConsoleGate;

impl ChallengeGate for ConsoleGate {
    async fn wait(&self) -> Result<()> {
        println!("\nThe listing page is open in the browser window.");
        println!("Solve the anti-bot challenge there if one is shown.");
        print!("Press Enter to continue once the listing is visible... ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        debug!("operator resumed the run");
        Ok(())
    }
}

impl<G: ChallengeGate + ?Sized> ChallengeGate for &G {
    async fn wait(&self) -> Result<()> {
        (**self).wait().await
    }
}

/// Resolves on `notify_one`, including a permit stored before `wait` started.
impl ChallengeGate for Notify {
    async fn wait(&self) -> Result<()> {
        self.notified().await;
        Ok(())
    }
}
