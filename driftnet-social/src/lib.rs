//! Timeline harvesting for social profiles rendered in a browser.
//!
//! The [`timeline`] module holds the pagination-and-extraction loop and the
//! [`timeline::surface::RenderSurface`] contract it drives; the WebDriver
//! session from `driftnet-drivers` is one implementation of that contract.
pub mod timeline;
