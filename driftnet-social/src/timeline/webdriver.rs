//! [`RenderSurface`] backed by the fantoccini session from `driftnet-drivers`.
use crate::timeline::surface::{QueryScope, RenderSurface, SurfaceElement, WaitOutcome};
use anyhow::Result;
use async_trait::async_trait;
use driftnet_drivers::driftnet_browser::{driver::DriftnetDriver, element::DriftnetElement};
use std::time::Duration;

#[async_trait]
impl QueryScope for DriftnetDriver {
    type Element = DriftnetElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<DriftnetElement>> {
        self.find_elements(selector).await
    }
}

#[async_trait]
impl RenderSurface for DriftnetDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.goto(url).await
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<WaitOutcome> {
        Ok(if self.wait_for_element(selector, timeout).await? {
            WaitOutcome::Present
        } else {
            WaitOutcome::TimedOut
        })
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        self.execute(script).await
    }

    async fn page_source(&self) -> Result<String> {
        self.get_content().await
    }

    async fn close(&self) -> Result<()> {
        DriftnetDriver::close(self).await
    }
}

#[async_trait]
impl QueryScope for DriftnetElement {
    type Element = DriftnetElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<DriftnetElement>> {
        self.find_elements(selector).await
    }
}

#[async_trait]
impl SurfaceElement for DriftnetElement {
    async fn text(&self) -> Result<String> {
        self.get_inner_text().await
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.get_attribute(name).await
    }
}
