use crate::driftnet_browser::{element::DriftnetElement, launch::chrome_capabilities};
use anyhow::Result;
use driftnet_common::DriftnetError;
use driftnet_config::BrowserConfig;
use fantoccini::{error::CmdError, Client, ClientBuilder, Locator};
use std::time::Duration;
use tracing::{debug, info};

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// One driver is one browser session. It is created by [`DriftnetDriver::connect`]
/// and released by [`DriftnetDriver::close`]; nothing holds it globally.
#[derive(Clone)]
pub struct DriftnetDriver {
    pub client: Client,
}

impl DriftnetDriver {
    /// Open a session on the WebDriver service at `browser.webdriver_url`.
    ///
    /// Fails with [`DriftnetError::ResourceUnavailable`] when the service is
    /// unreachable or refuses the session.
    pub async fn connect(browser: &BrowserConfig) -> driftnet_common::Result<Self> {
        info!(
            target: "browser.session",
            endpoint = %browser.webdriver_url,
            headless = browser.headless,
            "connecting to webdriver"
        );
        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(browser))
            .connect(&browser.webdriver_url)
            .await
            .map_err(|e| {
                DriftnetError::ResourceUnavailable(format!(
                    "could not start a browser session at {} ({e}); is chromedriver running?",
                    browser.webdriver_url
                ))
            })?;
        Ok(Self { client })
    }

    /// Navigate the session to `url`.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    /// Return the full page HTML source.
    pub async fn get_content(&self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    /// Find zero or more elements by CSS selector.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<DriftnetElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().map(DriftnetElement::new).collect())
    }

    /// Wait up to `timeout` for at least one element to match `selector`.
    ///
    /// Returns `Ok(false)` on timeout; other WebDriver failures are errors.
    pub async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<bool> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => {
                debug!(target: "browser.session", %selector, ?timeout, "wait timed out");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Run a synchronous script in the page and return its JSON result.
    pub async fn execute(&self, script: &str) -> Result<serde_json::Value> {
        Ok(self.client.execute(script, vec![]).await?)
    }

    /// Close the underlying browser session.
    pub async fn close(&self) -> Result<()> {
        self.client.clone().close().await?;
        info!(target: "browser.session", "browser session closed");
        Ok(())
    }
}
