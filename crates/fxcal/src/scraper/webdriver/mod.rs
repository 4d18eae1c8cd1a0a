//! W3C WebDriver client over HTTP, driving a headless Chrome through
//! chromedriver.

mod browser;
mod protocol;

pub use browser::{WebDriverBrowser, WebDriverLauncher, WebDriverOptions};
