//! Wire format of the WebDriver protocol.

use serde_json::{json, Value};

use fxcal_core::scrape::{BrowserError, ElementHandle};

use super::WebDriverOptions;

/// Key under which the protocol serializes element references.
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Error reported by the remote end (or by the transport in front of it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WireError {
    pub code: String,
    pub message: String,
}

impl WireError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            code: "transport".to_string(),
            message: err.to_string(),
        }
    }

    /// Reads `{"value": {"error": ..., "message": ...}}`, falling back to the
    /// HTTP status when the body carries no error code.
    pub fn from_body(status: u16, body: &Value) -> Self {
        let value = body.get("value");
        let code = value
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("http {status}"));
        let message = value
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self { code, message }
    }

    pub fn is_no_such_element(&self) -> bool {
        self.code == "no such element"
    }

    pub fn into_browser_error(self) -> BrowserError {
        let detail = if self.message.is_empty() {
            self.code.clone()
        } else {
            format!("{}: {}", self.code, self.message)
        };

        match self.code.as_str() {
            "stale element reference" => BrowserError::StaleElement(detail),
            "timeout" | "script timeout" => BrowserError::Timeout(detail),
            "session not created" => BrowserError::SessionStart(detail),
            _ => BrowserError::Protocol(detail),
        }
    }
}

/// Body of the new-session request.
pub(crate) fn session_request(options: &WebDriverOptions) -> Value {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-gpu".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        format!("--window-size={},{}", options.window_width, options.window_height),
        format!("--user-agent={}", options.user_agent),
    ];
    if options.headless {
        args.push("--headless=new".to_string());
    }
    if options.block_images {
        args.push("--blink-settings=imagesEnabled=false".to_string());
    }

    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "pageLoadStrategy": "normal",
                "goog:chromeOptions": {
                    "args": args,
                    "excludeSwitches": ["enable-automation"],
                }
            }
        }
    })
}

/// Session id from the `value` of a new-session response.
pub(crate) fn session_id(value: &Value) -> Option<String> {
    value
        .get("sessionId")
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) fn element(value: &Value) -> Option<ElementHandle> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(ElementHandle::new)
}

pub(crate) fn elements(value: &Value) -> Vec<ElementHandle> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(element).collect())
        .unwrap_or_default()
}

pub(crate) fn locator(selector: &str) -> Value {
    json!({ "using": "css selector", "value": selector })
}
