use std::fmt;

use thiserror::Error;

/// Stage of the extraction pipeline at which a fatal failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapeStage {
    LaunchBrowser,
    Navigate,
    DetectBlock,
    LocateRows,
    ExtractBasic,
    ExtractDetail,
}

impl ScrapeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStage::LaunchBrowser => "launch_browser",
            ScrapeStage::Navigate => "navigate",
            ScrapeStage::DetectBlock => "detect_block",
            ScrapeStage::LocateRows => "locate_rows",
            ScrapeStage::ExtractBasic => "extract_basic",
            ScrapeStage::ExtractDetail => "extract_detail",
        }
    }
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by a browser driver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("Failed to start browser session: {0}")]
    SessionStart(String),
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Browser protocol error: {0}")]
    Protocol(String),
    #[error("Timed out waiting for {0}")]
    Timeout(String),
    #[error("Element is no longer attached to the page: {0}")]
    StaleElement(String),
}

/// Fatal extraction failure. Everything short of this is absorbed per date.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("Scraping unavailable at {stage}: {cause}")]
    Unavailable { stage: ScrapeStage, cause: String },
}

impl ScrapeError {
    pub fn unavailable(stage: ScrapeStage, cause: impl fmt::Display) -> Self {
        ScrapeError::Unavailable {
            stage,
            cause: cause.to_string(),
        }
    }
}
