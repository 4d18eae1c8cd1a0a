use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tokio::time::Instant;
use url::Url;

use fxcal_core::scrape::{Browser, BrowserError, BrowserLauncher, BrowserResult, ElementHandle};

use super::protocol::{self, WireError};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How to reach chromedriver and what browser to ask it for.
#[derive(Debug, Clone)]
pub struct WebDriverOptions {
    /// Root of the WebDriver server, e.g. `http://localhost:9515`.
    pub endpoint: String,
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
    pub block_images: bool,
    /// Upper bound on any single WebDriver command.
    pub request_timeout: Duration,
}

impl Default for WebDriverOptions {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".to_string(),
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            window_width: 1920,
            window_height: 1080,
            block_images: true,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Issues one command and unwraps the `value` envelope of the reply.
async fn send(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<Value, WireError> {
    let request = client.request(method, url);
    let request = match body {
        Some(body) => request.json(&body),
        None => request,
    };

    let response = request.send().await.map_err(WireError::transport)?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        Ok(body.get("value").cloned().unwrap_or(Value::Null))
    } else {
        Err(WireError::from_body(status.as_u16(), &body))
    }
}

/// Creates and deletes WebDriver sessions.
pub struct WebDriverLauncher {
    client: Client,
    endpoint: Url,
    options: WebDriverOptions,
}

impl WebDriverLauncher {
    pub fn new(options: WebDriverOptions) -> Result<Self, BrowserError> {
        let endpoint = Url::parse(&options.endpoint).map_err(|err| {
            BrowserError::SessionStart(format!(
                "invalid WebDriver endpoint {}: {err}",
                options.endpoint
            ))
        })?;
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|err| BrowserError::SessionStart(err.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            options,
        })
    }

    fn sessions_url(&self) -> String {
        format!("{}/session", self.endpoint.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    type Browser = WebDriverBrowser;

    async fn launch(&self) -> BrowserResult<WebDriverBrowser> {
        let sessions_url = self.sessions_url();
        tracing::debug!(endpoint = %self.endpoint, "Creating WebDriver session");

        let value = send(
            &self.client,
            Method::POST,
            &sessions_url,
            Some(protocol::session_request(&self.options)),
        )
        .await
        .map_err(|err| BrowserError::SessionStart(format!("{}: {}", err.code, err.message)))?;

        let session_id = protocol::session_id(&value).ok_or_else(|| {
            BrowserError::SessionStart("response carried no session id".to_string())
        })?;
        tracing::info!(%session_id, "Browser session started");

        Ok(WebDriverBrowser {
            client: self.client.clone(),
            session_url: format!("{sessions_url}/{session_id}"),
            session_id,
        })
    }

    async fn close(&self, browser: WebDriverBrowser) -> BrowserResult<()> {
        send(&self.client, Method::DELETE, &browser.session_url, None)
            .await
            .map_err(WireError::into_browser_error)?;
        tracing::info!(session_id = %browser.session_id, "Browser session closed");
        Ok(())
    }
}

/// One WebDriver session.
pub struct WebDriverBrowser {
    client: Client,
    session_url: String,
    session_id: String,
}

impl WebDriverBrowser {
    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, WireError> {
        let url = format!("{}{}", self.session_url, path);
        send(&self.client, method, &url, body).await
    }

    async fn string_command(&self, path: &str) -> BrowserResult<String> {
        let value = self
            .command(Method::GET, path, None)
            .await
            .map_err(WireError::into_browser_error)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
            .map_err(|err| BrowserError::Navigation(format!("{url}: {}: {}", err.code, err.message)))?;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<String> {
        self.string_command("/url").await
    }

    async fn body_text(&self) -> BrowserResult<String> {
        match self.find_all("body").await?.first() {
            Some(body) => self.text(body).await,
            None => Ok(String::new()),
        }
    }

    async fn find_all(&self, selector: &str) -> BrowserResult<Vec<ElementHandle>> {
        let value = self
            .command(Method::POST, "/elements", Some(protocol::locator(selector)))
            .await
            .map_err(WireError::into_browser_error)?;
        Ok(protocol::elements(&value))
    }

    async fn find_in(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> BrowserResult<Option<ElementHandle>> {
        let path = format!("/element/{}/element", parent.id());
        match self
            .command(Method::POST, &path, Some(protocol::locator(selector)))
            .await
        {
            Ok(value) => Ok(protocol::element(&value)),
            Err(err) if err.is_no_such_element() => Ok(None),
            Err(err) => Err(err.into_browser_error()),
        }
    }

    async fn find_all_in(
        &self,
        parent: &ElementHandle,
        selector: &str,
    ) -> BrowserResult<Vec<ElementHandle>> {
        let path = format!("/element/{}/elements", parent.id());
        let value = self
            .command(Method::POST, &path, Some(protocol::locator(selector)))
            .await
            .map_err(WireError::into_browser_error)?;
        Ok(protocol::elements(&value))
    }

    async fn text(&self, element: &ElementHandle) -> BrowserResult<String> {
        self.string_command(&format!("/element/{}/text", element.id()))
            .await
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> BrowserResult<Option<String>> {
        let path = format!("/element/{}/attribute/{}", element.id(), name);
        let value = self
            .command(Method::GET, &path, None)
            .await
            .map_err(WireError::into_browser_error)?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn click(&self, element: &ElementHandle) -> BrowserResult<()> {
        let path = format!("/element/{}/click", element.id());
        self.command(Method::POST, &path, Some(json!({})))
            .await
            .map_err(WireError::into_browser_error)?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let deadline = Instant::now() + timeout;

        loop {
            if !self.find_all(selector).await?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(selector.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
