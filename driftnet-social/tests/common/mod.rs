//! In-memory render surface for exercising the harvester without a browser.
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use driftnet_common::observability::{LogConfig, LogFormat, init_logging};
use driftnet_social::timeline::{QueryScope, RenderSurface, SurfaceElement, WaitOutcome};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

static INIT_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Install the workspace subscriber once so harvest events are emitted.
/// `DRIFTNET_LOG_FORMAT=json` switches the encoding.
pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "driftnet-tests",
            log_dir: Some(std::env::temp_dir().join("driftnet-tests")),
            emit_stderr: true,
            format: if std::env::var("DRIFTNET_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug",
        };

        init_logging(config).unwrap_or_default()
    });
}

pub const TEXT_SELECTOR: &str = r#"[data-testid="tweetText"]"#;
pub const CONTAINER_SELECTOR: &str = r#"[data-testid="tweet"]"#;

#[derive(Debug, Default)]
struct Node {
    text: String,
    attributes: HashMap<String, String>,
    children: HashMap<String, Vec<FakeElement>>,
    broken: bool,
}

/// A DOM node whose children are looked up by exact selector string.
#[derive(Debug, Clone, Default)]
pub struct FakeElement(Arc<Node>);

impl FakeElement {
    pub fn builder() -> FakeElementBuilder {
        FakeElementBuilder::default()
    }

    /// A post container shaped like timeline markup.
    pub fn post(text: &str, datetime: Option<&str>) -> Self {
        let mut b = Self::builder().child(TEXT_SELECTOR, Self::builder().text(text).build());
        if let Some(dt) = datetime {
            b = b.child("time", Self::builder().attr("datetime", dt).build());
        }
        b.build()
    }
}

#[derive(Default)]
pub struct FakeElementBuilder(Node);

impl FakeElementBuilder {
    pub fn text(mut self, text: &str) -> Self {
        self.0.text = text.to_string();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.0.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, el: FakeElement) -> Self {
        self.0.children.entry(selector.to_string()).or_default().push(el);
        self
    }

    /// Every read on this node fails.
    pub fn broken(mut self) -> Self {
        self.0.broken = true;
        self
    }

    pub fn build(self) -> FakeElement {
        FakeElement(Arc::new(self.0))
    }
}

#[async_trait]
impl QueryScope for FakeElement {
    type Element = FakeElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        if self.0.broken {
            return Err(anyhow!("stale element reference"));
        }
        Ok(self.0.children.get(selector).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SurfaceElement for FakeElement {
    async fn text(&self) -> Result<String> {
        if self.0.broken {
            return Err(anyhow!("stale element reference"));
        }
        Ok(self.0.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        if self.0.broken {
            return Err(anyhow!("stale element reference"));
        }
        Ok(self.0.attributes.get(name).cloned())
    }
}

/// Every interaction the harvester had with the page, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Wait(String),
    Query(String),
    Scroll,
    ReadHeight,
    PageSource,
    Close,
}

/// What the page renders: one map of selector to matches per scroll position.
#[derive(Debug, Default)]
struct State {
    page_source: String,
    body_loads: bool,
    fail_navigation: bool,
    fail_scroll: bool,
    batches: Vec<HashMap<String, Vec<FakeElement>>>,
    batch: usize,
    heights: Vec<i64>,
    height_reads: usize,
    cancel_on_scroll: Option<CancellationToken>,
    calls: Vec<Call>,
}

#[derive(Debug, Clone)]
pub struct FakeSurface(Arc<Mutex<State>>);

impl FakeSurface {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(State {
            page_source: "<html><body></body></html>".into(),
            body_loads: true,
            batches: vec![HashMap::new()],
            heights: vec![1000],
            ..State::default()
        })))
    }

    /// Containers rendered under `selector` in the first batch.
    pub fn with_containers(self, selector: &str, containers: Vec<FakeElement>) -> Self {
        self.with_batches(selector, vec![containers])
    }

    /// Each scroll reveals the next batch; the last one sticks.
    pub fn with_batches(self, selector: &str, batches: Vec<Vec<FakeElement>>) -> Self {
        {
            let mut s = self.0.lock().unwrap();
            s.batches = batches
                .into_iter()
                .map(|b| HashMap::from([(selector.to_string(), b)]))
                .collect();
        }
        self
    }

    /// Successive scroll heights; the last value repeats.
    pub fn with_heights(self, heights: Vec<i64>) -> Self {
        self.0.lock().unwrap().heights = heights;
        self
    }

    pub fn with_page_source(self, source: &str) -> Self {
        self.0.lock().unwrap().page_source = source.to_string();
        self
    }

    pub fn never_loads(self) -> Self {
        self.0.lock().unwrap().body_loads = false;
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.0.lock().unwrap().fail_navigation = true;
        self
    }

    /// Every scroll command fails, as when the session dies mid-run.
    pub fn failing_scroll(self) -> Self {
        self.0.lock().unwrap().fail_scroll = true;
        self
    }

    pub fn cancel_on_scroll(self, token: CancellationToken) -> Self {
        self.0.lock().unwrap().cancel_on_scroll = Some(token);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn scrolls(&self) -> usize {
        self.count(&Call::Scroll)
    }

    pub fn queried_any(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, Call::Query(_)))
    }

    fn current(&self, selector: &str) -> Vec<FakeElement> {
        let s = self.0.lock().unwrap();
        s.batches[s.batch].get(selector).cloned().unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.0.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl QueryScope for FakeSurface {
    type Element = FakeElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        self.record(Call::Query(selector.to_string()));
        Ok(self.current(selector))
    }
}

#[async_trait]
impl RenderSurface for FakeSurface {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(Call::Navigate(url.to_string()));
        if self.0.lock().unwrap().fail_navigation {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED"));
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<WaitOutcome> {
        self.record(Call::Wait(selector.to_string()));
        let present = if selector == "body" {
            self.0.lock().unwrap().body_loads
        } else {
            !self.current(selector).is_empty()
        };
        Ok(if present {
            WaitOutcome::Present
        } else {
            WaitOutcome::TimedOut
        })
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        let mut s = self.0.lock().unwrap();
        if script.contains("scrollTo") {
            s.calls.push(Call::Scroll);
            if s.fail_scroll {
                return Err(anyhow!("invalid session id: session deleted"));
            }
            s.batch = (s.batch + 1).min(s.batches.len() - 1);
            if let Some(token) = &s.cancel_on_scroll {
                token.cancel();
            }
            Ok(serde_json::Value::Null)
        } else if script.contains("scrollHeight") {
            s.calls.push(Call::ReadHeight);
            let idx = s.height_reads.min(s.heights.len() - 1);
            s.height_reads += 1;
            Ok(serde_json::json!(s.heights[idx]))
        } else {
            Err(anyhow!("unexpected script: {script}"))
        }
    }

    async fn page_source(&self) -> Result<String> {
        self.record(Call::PageSource);
        Ok(self.0.lock().unwrap().page_source.clone())
    }

    async fn close(&self) -> Result<()> {
        self.record(Call::Close);
        Ok(())
    }
}
