//! Pure building blocks of calendar extraction: browser traits, selector
//! tables, label mapping and the retry schedule.

mod error;
mod pacing;
mod page;
mod selectors;
mod specs;
mod traits;

pub use error::{BrowserError, ScrapeError, ScrapeStage};
pub use pacing::{BackoffPolicy, Jitter, Pacing};
pub use page::{
    calendar_url, detail_fragment_url, is_bot_challenge, BOT_MARKERS, DEFAULT_BASE_URL,
    DETAIL_LINK_SELECTOR, DETAIL_PANE_SELECTOR, ROW_ID_ATTRIBUTE, ROW_SELECTOR,
    SPECS_CELL_SELECTOR, SPECS_ROW_SELECTOR, SPECS_TABLE_SELECTOR,
};
pub use selectors::{impact_from_class, Accept, RowSelectors, SelectorChain};
pub use specs::{apply_spec_rows, SpecField, NOTES_SEPARATOR};
pub use traits::{Browser, BrowserLauncher, BrowserResult, ElementHandle, Scraper};
