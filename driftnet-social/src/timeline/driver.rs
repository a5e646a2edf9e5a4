//! The pagination loop: locate containers, extract, scroll, watch the height.
//!
//! A run moves through navigating, probing for a missing account, locating
//! the first container selector, then harvesting until the item limit is hit
//! or the page height stops changing for `max_stall_iterations` scrolls.
//! Every terminal state yields a [`HarvestReport`] carrying whatever was
//! collected so far; nothing here panics or returns early with an error.
use crate::timeline::collector::DedupCollector;
use crate::timeline::extract::{Extraction, ItemExtractor};
use crate::timeline::item::TimelineItem;
use crate::timeline::selector::{CandidateSelectors, resolve};
use crate::timeline::surface::{RenderSurface, SurfaceElement, WaitOutcome};
use anyhow::anyhow;
use driftnet_common::{DriftnetError, ItemLimit};
use driftnet_config::TimelineConfig;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
const READ_SCROLL_HEIGHT: &str = "return document.body.scrollHeight";
const PREVIEW_CHARS: usize = 50;

/// Tunables for one harvest.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub containers: CandidateSelectors,
    /// Page-source fragments meaning "this account does not exist".
    pub missing_markers: Vec<String>,
    pub load_timeout: Duration,
    /// Per-candidate wait while locating the first containers.
    pub selector_timeout: Duration,
    /// Pause after each scroll so lazy rendering can catch up.
    pub settle_interval: Duration,
    pub max_stall_iterations: u32,
}

impl HarvestSettings {
    pub fn from_config(timeline: &TimelineConfig) -> driftnet_common::Result<Self> {
        Ok(Self {
            containers: CandidateSelectors::new(timeline.container_selectors.clone())?,
            missing_markers: timeline.missing_markers.clone(),
            load_timeout: Duration::from_secs(timeline.load_timeout_secs),
            selector_timeout: Duration::from_secs(timeline.selector_timeout_secs),
            settle_interval: Duration::from_millis(timeline.settle_interval_ms),
            max_stall_iterations: timeline.max_stall_iterations,
        })
    }
}

/// Why a run ended.
#[derive(Debug)]
pub enum Termination {
    /// The page height stopped changing: end of the timeline.
    StallExhausted,
    LimitReached,
    /// The page says the account does not exist.
    TargetMissing,
    Cancelled,
    Failed(DriftnetError),
}

impl Termination {
    /// Everything except `Failed` and `Cancelled` is a normal completion.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Termination::StallExhausted | Termination::LimitReached | Termination::TargetMissing
        )
    }
}

/// Outcome of a run: the items collected (possibly none) and how it ended.
#[derive(Debug)]
pub struct HarvestReport {
    pub items: Vec<TimelineItem>,
    pub termination: Termination,
    /// Raw page markup, captured when no container selector ever matched.
    pub diagnostic_markup: Option<String>,
}

impl HarvestReport {
    fn new(items: Vec<TimelineItem>, termination: Termination) -> Self {
        Self {
            items,
            termination,
            diagnostic_markup: None,
        }
    }

    fn failed(error: DriftnetError) -> Self {
        Self::new(Vec::new(), Termination::Failed(error))
    }
}

/// Page height bookkeeping between scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub last_height: i64,
    pub stalled_iterations: u32,
}

impl ScrollState {
    pub fn new(initial_height: i64) -> Self {
        Self {
            last_height: initial_height,
            stalled_iterations: 0,
        }
    }

    /// Record a new height measurement. Returns `true` if it was a stall.
    pub fn observe(&mut self, height: i64) -> bool {
        if height == self.last_height {
            self.stalled_iterations += 1;
            true
        } else {
            self.last_height = height;
            self.stalled_iterations = 0;
            false
        }
    }
}

/// Drives a [`RenderSurface`] through one timeline harvest.
#[derive(Debug, Clone)]
pub struct TimelineHarvester {
    settings: HarvestSettings,
    extractor: ItemExtractor,
}

impl TimelineHarvester {
    pub fn new(settings: HarvestSettings, extractor: ItemExtractor) -> Self {
        Self {
            settings,
            extractor,
        }
    }

    pub fn from_config(timeline: &TimelineConfig) -> driftnet_common::Result<Self> {
        Ok(Self::new(
            HarvestSettings::from_config(timeline)?,
            ItemExtractor::from_config(timeline)?,
        ))
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Harvest the timeline at `target_url`. The surface is borrowed, not
    /// closed; see [`harvest_scoped`] for the owning variant.
    pub async fn run<S>(
        &self,
        surface: &S,
        target_url: &str,
        limit: ItemLimit,
        cancel: &CancellationToken,
    ) -> HarvestReport
    where
        S: RenderSurface,
        S::Element: SurfaceElement,
    {
        info!(target: "timeline.driver", url = %target_url, %limit, "opening timeline");

        match until_cancelled(cancel, surface.navigate(target_url)).await {
            None => return HarvestReport::new(Vec::new(), Termination::Cancelled),
            Some(Err(e)) => return HarvestReport::failed(DriftnetError::Surface(e)),
            Some(Ok(())) => {}
        }

        let loaded = surface.wait_for_selector("body", self.settings.load_timeout);
        match until_cancelled(cancel, loaded).await {
            None => return HarvestReport::new(Vec::new(), Termination::Cancelled),
            Some(Err(e)) => return HarvestReport::failed(DriftnetError::Surface(e)),
            Some(Ok(WaitOutcome::TimedOut)) => {
                warn!(target: "timeline.driver", "timed out waiting for page to load");
                return HarvestReport::failed(DriftnetError::LoadTimeout {
                    url: target_url.to_string(),
                    waited_secs: self.settings.load_timeout.as_secs(),
                });
            }
            Some(Ok(WaitOutcome::Present)) => {
                info!(target: "timeline.driver", "page loaded; looking for posts");
            }
        }

        if self.target_is_missing(surface).await {
            info!(target: "timeline.driver", url = %target_url, "account does not seem to exist");
            return HarvestReport::new(Vec::new(), Termination::TargetMissing);
        }

        match until_cancelled(cancel, self.locate_containers(surface)).await {
            None => return HarvestReport::new(Vec::new(), Termination::Cancelled),
            Some(Err(e)) => return HarvestReport::failed(DriftnetError::Surface(e)),
            Some(Ok(true)) => {}
            Some(Ok(false)) => {
                warn!(
                    target: "timeline.driver",
                    "could not find any posts on the page; the page structure may have changed"
                );
                let mut report = HarvestReport::failed(DriftnetError::NoContainersFound {
                    tried: self.settings.containers.as_slice().to_vec(),
                });
                report.diagnostic_markup = surface.page_source().await.ok();
                return report;
            }
        }

        let mut collector = DedupCollector::new();
        let termination = match self.harvest(surface, limit, cancel, &mut collector).await {
            Ok(termination) => termination,
            Err(e) => {
                warn!(target: "timeline.driver", error = %e, "harvest aborted");
                Termination::Failed(e)
            }
        };
        info!(
            target: "timeline.driver",
            total = collector.len(),
            ?termination,
            "harvest finished"
        );
        HarvestReport::new(collector.into_items(), termination)
    }

    /// Unreadable page source is not proof of absence; the run continues.
    async fn target_is_missing<S: RenderSurface>(&self, surface: &S) -> bool {
        match surface.page_source().await {
            Ok(source) => self
                .settings
                .missing_markers
                .iter()
                .any(|marker| source.contains(marker.as_str())),
            Err(e) => {
                debug!(
                    target: "timeline.driver",
                    error = %e,
                    "page source unavailable for existence probe"
                );
                false
            }
        }
    }

    /// Wait for each container candidate in turn; true once one is present.
    async fn locate_containers<S: RenderSurface>(&self, surface: &S) -> anyhow::Result<bool> {
        for selector in self.settings.containers.iter() {
            match surface
                .wait_for_selector(selector, self.settings.selector_timeout)
                .await?
            {
                WaitOutcome::Present => {
                    info!(target: "timeline.driver", %selector, "found posts using selector");
                    return Ok(true);
                }
                WaitOutcome::TimedOut => {
                    info!(target: "timeline.driver", %selector, "selector not found, trying next");
                }
            }
        }
        Ok(false)
    }

    async fn harvest<S>(
        &self,
        surface: &S,
        limit: ItemLimit,
        cancel: &CancellationToken,
        collector: &mut DedupCollector,
    ) -> driftnet_common::Result<Termination>
    where
        S: RenderSurface,
        S::Element: SurfaceElement,
    {
        let max_stall = self.settings.max_stall_iterations;
        let mut scroll = ScrollState::new(read_scroll_height(surface).await?);
        // Containers are assumed to keep their order across re-queries, so
        // everything before this offset has already been visited.
        let mut processed = 0usize;

        info!(target: "timeline.driver", "scrolling and collecting posts");
        while !limit.is_reached(collector.len()) && scroll.stalled_iterations < max_stall {
            if cancel.is_cancelled() {
                return Ok(Termination::Cancelled);
            }

            // Markup can shift between iterations, so resolve afresh each time.
            let containers = resolve(&self.settings.containers, surface)
                .await?
                .map(|resolved| resolved.elements)
                .unwrap_or_default();

            for container in containers.iter().skip(processed) {
                processed += 1;
                match self.extractor.extract(container).await {
                    Extraction::Skip(reason) => {
                        debug!(target: "timeline.extract", ?reason, "skipping container");
                        continue;
                    }
                    Extraction::Item(item) => {
                        let preview = item.preview(PREVIEW_CHARS);
                        if collector.offer(item) {
                            info!(
                                target: "timeline.driver",
                                "collected post {}: {}",
                                collector.len(),
                                preview
                            );
                        }
                    }
                }
                if limit.is_reached(collector.len()) {
                    break;
                }
            }

            if limit.is_reached(collector.len()) {
                break;
            }

            surface.execute_script(SCROLL_TO_BOTTOM).await?;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Termination::Cancelled),
                _ = tokio::time::sleep(self.settings.settle_interval) => {}
            }

            let height = read_scroll_height(surface).await?;
            if scroll.observe(height) {
                info!(
                    target: "timeline.driver",
                    "no new content loaded; attempt {}/{}",
                    scroll.stalled_iterations,
                    max_stall
                );
            }
        }

        Ok(if limit.is_reached(collector.len()) {
            Termination::LimitReached
        } else {
            Termination::StallExhausted
        })
    }
}

/// Run a harvest on an owned surface and close it afterwards, whatever the
/// outcome. Close failures are logged, not reported.
pub async fn harvest_scoped<S>(
    surface: S,
    harvester: &TimelineHarvester,
    target_url: &str,
    limit: ItemLimit,
    cancel: &CancellationToken,
) -> HarvestReport
where
    S: RenderSurface,
    S::Element: SurfaceElement,
{
    let report = harvester.run(&surface, target_url, limit, cancel).await;
    if let Err(e) = surface.close().await {
        warn!(target: "timeline.driver", error = %e, "failed to close render surface");
    }
    report
}

async fn read_scroll_height<S: RenderSurface>(surface: &S) -> anyhow::Result<i64> {
    let value = surface.execute_script(READ_SCROLL_HEIGHT).await?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|h| h as i64))
        .ok_or_else(|| anyhow!("scroll height script returned {value}"))
}

/// `None` if `cancel` fires before `fut` completes. An already cancelled
/// token wins without polling `fut`.
pub async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
