//! Common types and utilities shared across driftnet crates.
//!
//! This crate defines the shared error type, the item-count limit used by the
//! timeline harvester, and the observability helpers every binary and test
//! uses. It stays dependency-light so that every crate can depend on it.
//!
//! # Overview
//!
//! - [`DriftnetError`] and [`Result`]: Shared error handling
//! - [`ItemLimit`]: How many items a harvest may collect
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use driftnet_common::ItemLimit;
//!
//! let limit = ItemLimit::from(Some(2));
//! assert!(!limit.is_reached(1));
//! assert!(limit.is_reached(2));
//! assert!(!ItemLimit::Unbounded.is_reached(usize::MAX));
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod observability;

/// Upper bound on the number of items a single harvest collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemLimit {
    /// Stop once this many items are collected. `Bounded(0)` counts as
    /// already reached.
    Bounded(usize),
    /// Keep going until the timeline stops growing.
    #[default]
    Unbounded,
}

impl ItemLimit {
    /// True once `collected` items satisfy the limit.
    pub fn is_reached(&self, collected: usize) -> bool {
        match self {
            ItemLimit::Bounded(max) => collected >= *max,
            ItemLimit::Unbounded => false,
        }
    }
}

impl From<Option<usize>> for ItemLimit {
    fn from(value: Option<usize>) -> Self {
        match value {
            Some(n) => ItemLimit::Bounded(n),
            None => ItemLimit::Unbounded,
        }
    }
}

impl fmt::Display for ItemLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLimit::Bounded(n) => write!(f, "{n}"),
            ItemLimit::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Error types used across the driftnet workspace.
#[derive(thiserror::Error, Debug)]
pub enum DriftnetError {
    /// The page never reached a minimally loaded state.
    #[error("timed out after {waited_secs}s waiting for {url} to load")]
    LoadTimeout { url: String, waited_secs: u64 },

    /// None of the container selectors matched, even after waiting.
    #[error("no timeline containers found (tried: {})", tried.join(", "))]
    NoContainersFound { tried: Vec<String> },

    /// The render surface (browser session) could not be acquired.
    #[error("render surface unavailable: {0}")]
    ResourceUnavailable(String),

    /// The render surface reported an error mid-run.
    #[error("render surface error: {0}")]
    Surface(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing an artifact failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was interrupted by the caller.
    #[error("operation cancelled")]
    Cancelled,
}

/// Convenient alias for results that use [`DriftnetError`].
pub type Result<T> = std::result::Result<T, DriftnetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_zero_is_already_reached() {
        assert!(ItemLimit::Bounded(0).is_reached(0));
    }

    #[test]
    fn unbounded_is_never_reached() {
        assert!(!ItemLimit::Unbounded.is_reached(0));
        assert!(!ItemLimit::Unbounded.is_reached(10_000));
    }

    #[test]
    fn limit_from_option() {
        assert_eq!(ItemLimit::from(None), ItemLimit::Unbounded);
        assert_eq!(ItemLimit::from(Some(5)), ItemLimit::Bounded(5));
        assert_eq!(ItemLimit::Bounded(5).to_string(), "5");
        assert_eq!(ItemLimit::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn no_containers_lists_every_candidate() {
        let err = DriftnetError::NoContainersFound {
            tried: vec!["article".into(), "div.post".into()],
        };
        assert_eq!(
            err.to_string(),
            "no timeline containers found (tried: article, div.post)"
        );
    }
}
