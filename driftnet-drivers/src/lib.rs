//! Driver layer for browser automation.
//!
//! This crate wraps a `fantoccini` WebDriver session so the timeline
//! harvester can navigate, query the DOM, and drive scrolling.
//!
//! - [`driftnet_browser::driver::DriftnetDriver`]: WebDriver client wrapper
//! - [`driftnet_browser::element::DriftnetElement`]: typed element helpers
//! - [`driftnet_browser::launch`]: Chrome command-line arguments
pub mod driftnet_browser;
