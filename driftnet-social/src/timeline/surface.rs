//! The browser contract the harvester depends on.
//!
//! Only what the loop needs is exposed: navigation, CSS queries at page and
//! element scope, a bounded presence wait, script execution (used solely to
//! read and force the scroll height), the page source, and teardown.
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Result of a bounded wait on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Present,
    TimedOut,
}

/// Something CSS selectors can be run against: the whole page or one element.
#[async_trait]
pub trait QueryScope: Send + Sync {
    type Element: Send + Sync;

    /// All elements currently matching `selector` inside this scope.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;
}

/// A rendered DOM element.
#[async_trait]
pub trait SurfaceElement: QueryScope<Element = Self> + Sized {
    /// Visible text of the element.
    async fn text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;
}

/// A live rendering session (a browser tab, or a fake in tests).
#[async_trait]
pub trait RenderSurface: QueryScope {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait up to `timeout` for `selector` to match at least one element.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<WaitOutcome>;

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    async fn page_source(&self) -> Result<String>;

    /// Release the session. Called exactly once, on every exit path.
    async fn close(&self) -> Result<()>;
}
