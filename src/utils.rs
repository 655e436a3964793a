use std::time::Duration;

use tracing::{info, instrument};

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[instrument]
pub fn display_elapsed_time(duration: Duration) {
    let total_ms = duration.as_millis();

    if total_ms >= 60000 {
        let mins = total_ms / 60000;
        let secs = (total_ms % 60000) / 1000;
        let ms_remaining = total_ms % 1000;

        if ms_remaining > 0 {
            info!("✅ finished in {}m {}s {}ms", mins, secs, ms_remaining);
        } else {
            info!("✅ finished in {}m {}s", mins, secs);
        }
    } else if total_ms >= 1000 {
        let secs = total_ms / 1000;
        let ms_remaining = total_ms % 1000;

        if ms_remaining > 0 {
            info!("✅ finished in {}s {}ms", secs, ms_remaining);
        } else {
            info!("✅ finished in {}s", secs);
        }
    } else {
        info!("✅ finished in {}ms", total_ms);
    }
}
