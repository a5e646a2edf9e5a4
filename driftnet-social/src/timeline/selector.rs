//! Ranked CSS selector candidates and first-match resolution.
//!
//! Timeline markup is undocumented and shifts without notice, so every lookup
//! goes through an ordered list of candidates: the most specific markup
//! first, generic fallbacks last. Updating the list is a configuration change.
use crate::timeline::surface::QueryScope;
use anyhow::Result;
use driftnet_common::DriftnetError;
use std::fmt;
use tracing::trace;

/// Ordered, non-empty list of selectors; the first one that matches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSelectors(Vec<String>);

impl CandidateSelectors {
    /// Build a candidate list, rejecting empty lists and blank entries.
    ///
    /// ```
    /// use driftnet_social::timeline::CandidateSelectors;
    ///
    /// let sel = CandidateSelectors::new(vec!["article".into(), "div.post".into()]).unwrap();
    /// assert_eq!(sel.len(), 2);
    /// assert!(CandidateSelectors::new(vec![]).is_err());
    /// ```
    pub fn new(candidates: Vec<String>) -> driftnet_common::Result<Self> {
        if candidates.is_empty() {
            return Err(DriftnetError::Config(
                "selector candidate list must not be empty".into(),
            ));
        }
        if let Some(pos) = candidates.iter().position(|c| c.trim().is_empty()) {
            return Err(DriftnetError::Config(format!(
                "selector candidate #{} is blank",
                pos + 1
            )));
        }
        Ok(Self(candidates))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CandidateSelectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" | "))
    }
}

/// The winning candidate and everything it matched.
#[derive(Debug)]
pub struct Resolved<'a, E> {
    /// Position of the winning candidate in the list.
    pub index: usize,
    pub selector: &'a str,
    pub elements: Vec<E>,
}

/// Return the first candidate that matches at least one element in `scope`.
///
/// `Ok(None)` means no candidate matched; whether that is fatal is up to the
/// caller. Query errors are returned as-is, without retrying.
pub async fn resolve<'a, S>(
    candidates: &'a CandidateSelectors,
    scope: &S,
) -> Result<Option<Resolved<'a, S::Element>>>
where
    S: QueryScope + ?Sized,
{
    resolve_from(candidates, 0, scope).await
}

/// Like [`resolve`], but skip candidates before `start`.
pub async fn resolve_from<'a, S>(
    candidates: &'a CandidateSelectors,
    start: usize,
    scope: &S,
) -> Result<Option<Resolved<'a, S::Element>>>
where
    S: QueryScope + ?Sized,
{
    for (index, selector) in candidates.iter().enumerate().skip(start) {
        let elements = scope.query_all(selector).await?;
        trace!(target: "timeline.selector", %selector, matched = elements.len());
        if !elements.is_empty() {
            return Ok(Some(Resolved {
                index,
                selector,
                elements,
            }));
        }
    }
    Ok(None)
}
