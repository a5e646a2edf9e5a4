//! Turn one rendered post container into a [`TimelineItem`].
use crate::timeline::item::{TimelineItem, Timestamp};
use crate::timeline::selector::{CandidateSelectors, resolve_from};
use crate::timeline::surface::SurfaceElement;
use anyhow::Result;
use driftnet_config::TimelineConfig;
use tracing::debug;

/// What the extractor made of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Item(TimelineItem),
    Skip(SkipReason),
}

/// Why a container contributed nothing. Never fatal to the harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No text candidate produced non-empty text.
    NoText,
    /// The surface failed while the container was being read.
    Surface(String),
}

#[derive(Debug, Clone)]
pub struct ItemExtractor {
    text_selectors: CandidateSelectors,
    timestamp_selector: String,
    timestamp_attribute: String,
}

impl ItemExtractor {
    pub fn new(
        text_selectors: CandidateSelectors,
        timestamp_selector: impl Into<String>,
        timestamp_attribute: impl Into<String>,
    ) -> Self {
        Self {
            text_selectors,
            timestamp_selector: timestamp_selector.into(),
            timestamp_attribute: timestamp_attribute.into(),
        }
    }

    pub fn from_config(timeline: &TimelineConfig) -> driftnet_common::Result<Self> {
        Ok(Self::new(
            CandidateSelectors::new(timeline.text_selectors.clone())?,
            timeline.timestamp_selector.clone(),
            timeline.timestamp_attribute.clone(),
        ))
    }

    /// Read text and timestamp from `container`. Purely reads.
    pub async fn extract<E: SurfaceElement>(&self, container: &E) -> Extraction {
        let text = match self.extract_text(container).await {
            Ok(Some(text)) => text,
            Ok(None) => return Extraction::Skip(SkipReason::NoText),
            Err(e) => return Extraction::Skip(SkipReason::Surface(format!("{e:#}"))),
        };
        let timestamp = self.extract_timestamp(container).await;
        Extraction::Item(TimelineItem::new(text, timestamp))
    }

    /// Text of the first candidate whose matches join to something non-empty.
    async fn extract_text<E: SurfaceElement>(&self, container: &E) -> Result<Option<String>> {
        let mut start = 0;
        while let Some(resolved) = resolve_from(&self.text_selectors, start, container).await? {
            let mut parts = Vec::with_capacity(resolved.elements.len());
            for element in &resolved.elements {
                let text = element.text().await?;
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            if !parts.is_empty() {
                return Ok(Some(parts.join(" ")));
            }
            debug!(
                target: "timeline.extract",
                selector = resolved.selector,
                "matched elements carry no text; trying next candidate"
            );
            start = resolved.index + 1;
        }
        Ok(None)
    }

    async fn extract_timestamp<E: SurfaceElement>(&self, container: &E) -> Timestamp {
        let lookup = async {
            let found = container.query_all(&self.timestamp_selector).await?;
            match found.first() {
                Some(el) => el.attribute(&self.timestamp_attribute).await,
                None => Ok(None),
            }
        };
        match lookup.await {
            Ok(value) => Timestamp::from_attribute(value),
            Err(e) => {
                debug!(target: "timeline.extract", error = %e, "timestamp unreadable");
                Timestamp::Unknown
            }
        }
    }
}
