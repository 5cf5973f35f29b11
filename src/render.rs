use crate::error::RenderError;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use url::Url;

/// Fully-settled HTML for a page plus the URL the browser ended up on.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,

    /// URL after any redirects
    pub final_url: Url,
}

/// Seam between the crawl controller and the browser subsystem.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    async fn render(&mut self, url: &Url) -> Result<RenderedPage, RenderError>;
}

/// Renders pages through a WebDriver session.
///
/// The connection is opened lazily on the first render and reused across
/// pages. A lost session drops the client so the next render reconnects.
pub struct WebDriverRenderer {
    webdriver_url: String,
    page_load_timeout: Duration,
    settle_delay: Duration,
    client: Option<Client>,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: &str, page_load_timeout: Duration, settle_delay: Duration) -> Self {
        // Environment override for hosts where the WebDriver lives elsewhere
        let webdriver_url = std::env::var("WEBDRIVER_URL")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| webdriver_url.to_string());

        Self {
            webdriver_url,
            page_load_timeout,
            settle_delay,
            client: None,
        }
    }

    /// Capabilities for an unattended browser: headless, no GPU or sandbox,
    /// and tolerant of invalid TLS certificates on the crawl target.
    fn capabilities() -> serde_json::Map<String, serde_json::Value> {
        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless",
                    "--disable-gpu",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                ]
            }),
        );
        caps.insert("acceptInsecureCerts".to_string(), json!(true));
        caps
    }

    async fn client(&mut self) -> Result<&mut Client, RenderError> {
        if self.client.is_none() {
            ::log::debug!("Connecting to WebDriver at {}", self.webdriver_url);
            let client = ClientBuilder::native()
                .capabilities(Self::capabilities())
                .connect(&self.webdriver_url)
                .await
                .map_err(|source| RenderError::Connect {
                    webdriver_url: self.webdriver_url.clone(),
                    source,
                })?;
            self.client = Some(client);
        }

        // Just connected or already live - unwrap safely
        Ok(self.client.as_mut().unwrap())
    }

    /// Ends the WebDriver session, if one was ever opened.
    pub async fn shutdown(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }
}

impl Renderer for WebDriverRenderer {
    async fn render(&mut self, url: &Url) -> Result<RenderedPage, RenderError> {
        let budget = self.page_load_timeout + self.settle_delay;
        let settle_delay = self.settle_delay;
        let target = url.as_str().to_string();

        let client = self.client().await?;

        let outcome = timeout(budget, async {
            client.goto(&target).await?;

            // Give client-side rendering time to settle before reading the DOM
            sleep(settle_delay).await;

            let html = client.source().await?;
            let final_url = client.current_url().await?;
            Ok::<_, fantoccini::error::CmdError>(RenderedPage { html, final_url })
        })
        .await;

        match outcome {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(source)) => {
                if source.to_string().contains("Unable to find session") {
                    // A dead session poisons every later render; force a
                    // reconnect on the next call.
                    self.client = None;
                    Err(RenderError::SessionLost { url: target })
                } else {
                    Err(RenderError::Navigation {
                        url: target,
                        source,
                    })
                }
            }
            Err(_) => Err(RenderError::Timeout { url: target }),
        }
    }
}
