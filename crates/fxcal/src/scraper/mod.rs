//! Browser-driven extraction of calendar rows.

mod detail;
mod pipeline;
mod row;
pub mod webdriver;

#[cfg(test)]
pub mod testing;

use std::time::Duration;

use rand::Rng;

use fxcal_core::scrape::Jitter;

pub use pipeline::{ExtractionPipeline, PipelineSettings};
pub use webdriver::{WebDriverLauncher, WebDriverOptions};

/// Sleeps for `delay`, skipping the timer entirely when it is zero.
async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Draws a delay uniformly from `jitter`.
fn sample(jitter: Jitter) -> Duration {
    if jitter.min >= jitter.max {
        return jitter.min;
    }
    jitter.at(rand::rng().random::<f64>())
}
