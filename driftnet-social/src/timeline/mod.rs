//! Scroll-driven harvesting of a profile timeline.
//!
//! [`driver::TimelineHarvester`] owns the loop: it locates rendered post
//! containers through [`selector::resolve`], turns each unseen container into
//! a [`item::TimelineItem`] via [`extract::ItemExtractor`], merges results in a
//! [`collector::DedupCollector`], then scrolls and watches the page height to
//! decide when the timeline has stopped growing.
pub mod account;
pub mod collector;
pub mod driver;
pub mod export;
pub mod extract;
pub mod item;
pub mod selector;
pub mod surface;
pub mod webdriver;

pub use collector::DedupCollector;
pub use driver::{
    HarvestReport, HarvestSettings, Termination, TimelineHarvester, harvest_scoped, until_cancelled,
};
pub use extract::{Extraction, ItemExtractor, SkipReason};
pub use item::{TimelineItem, Timestamp};
pub use selector::CandidateSelectors;
pub use surface::{QueryScope, RenderSurface, SurfaceElement, WaitOutcome};
