use std::fmt;

/// When a post was published, as read from its `datetime` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// ISO-8601 string exactly as the page provided it.
    Known(String),
    Unknown,
}

impl Timestamp {
    /// Blank or missing attribute values collapse to [`Timestamp::Unknown`].
    pub fn from_attribute(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Timestamp::Known(v.trim().to_string()),
            _ => Timestamp::Unknown,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Known(ts) => f.write_str(ts),
            Timestamp::Unknown => f.write_str("Unknown"),
        }
    }
}

/// One post harvested from the timeline. Equal iff text and timestamp are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimelineItem {
    pub text: String,
    pub timestamp: Timestamp,
}

impl TimelineItem {
    pub fn new(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }

    /// First `max_chars` characters of the text, for progress logs.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_renders_literal() {
        assert_eq!(Timestamp::Unknown.to_string(), "Unknown");
        assert_eq!(
            Timestamp::Known("2024-05-01T10:00:00.000Z".into()).to_string(),
            "2024-05-01T10:00:00.000Z"
        );
    }

    #[test]
    fn blank_attribute_is_unknown() {
        assert_eq!(Timestamp::from_attribute(None), Timestamp::Unknown);
        assert_eq!(Timestamp::from_attribute(Some("  ".into())), Timestamp::Unknown);
        assert_eq!(
            Timestamp::from_attribute(Some("2024-05-01T10:00:00Z".into())),
            Timestamp::Known("2024-05-01T10:00:00Z".into())
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let item = TimelineItem::new("héllo wörld", Timestamp::Unknown);
        assert_eq!(item.preview(5), "héllo...");
        assert_eq!(item.preview(50), "héllo wörld");
    }

    #[test]
    fn equality_covers_both_fields() {
        let a = TimelineItem::new("same", Timestamp::Unknown);
        let b = TimelineItem::new("same", Timestamp::Known("2024-01-01T00:00:00Z".into()));
        assert_ne!(a, b);
        assert_eq!(a, TimelineItem::new("same", Timestamp::Unknown));
    }
}
