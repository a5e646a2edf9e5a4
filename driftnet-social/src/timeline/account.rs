use driftnet_common::DriftnetError;
use url::Url;

/// Strip surrounding whitespace and `@` from a handle.
///
/// `None` if nothing is left or the rest is not made of ASCII letters,
/// digits, and underscores.
///
/// ```
/// use driftnet_social::timeline::account::normalize_handle;
///
/// assert_eq!(normalize_handle(" @rustlang ").as_deref(), Some("rustlang"));
/// assert_eq!(normalize_handle("@"), None);
/// assert_eq!(normalize_handle("../settings"), None);
/// ```
pub fn normalize_handle(raw: &str) -> Option<String> {
    let handle = raw.trim().trim_matches('@').trim();
    let valid = !handle.is_empty()
        && handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| handle.to_string())
}

/// Profile URL for `handle` under `base_url` (e.g. `https://x.com/<handle>`).
///
/// The handle is always appended as one path segment, so it can never change
/// the scheme or host of `base_url`.
pub fn profile_url(base_url: &str, handle: &str) -> driftnet_common::Result<Url> {
    let invalid = |reason: &str| {
        DriftnetError::Config(format!("invalid profile url base {base_url}: {reason}"))
    };
    let mut url = Url::parse(base_url.trim()).map_err(|e| invalid(&e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot carry a path"))?
        .pop_if_empty()
        .push(handle);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_profile_url() {
        let url = profile_url("https://x.com", "rustlang").unwrap();
        assert_eq!(url.as_str(), "https://x.com/rustlang");
    }

    #[test]
    fn keeps_base_path() {
        let url = profile_url("http://localhost:8080/mirror/", "jack").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/jack");
        let url = profile_url("http://localhost:8080/mirror", "jack").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/jack");
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(matches!(
            profile_url("not a url", "jack"),
            Err(DriftnetError::Config(_))
        ));
    }

    #[test]
    fn handle_stays_under_base_host() {
        let url = profile_url("https://x.com", "//evil.example").unwrap();
        assert_eq!(url.host_str(), Some("x.com"));
        assert_eq!(url.as_str(), "https://x.com/%2F%2Fevil.example");

        let url = profile_url("https://x.com", "javascript:alert(1)").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("x.com"));
    }

    #[test]
    fn rejects_base_without_path() {
        assert!(matches!(
            profile_url("mailto:someone@example.com", "jack"),
            Err(DriftnetError::Config(_))
        ));
    }

    #[test]
    fn handles_outside_the_charset_are_rejected() {
        assert_eq!(normalize_handle("//evil.example"), None);
        assert_eq!(normalize_handle("javascript:alert(1)"), None);
        assert_eq!(normalize_handle("jack doe"), None);
        assert_eq!(normalize_handle("rust_lang2").as_deref(), Some("rust_lang2"));
    }

    #[test]
    fn strips_at_signs() {
        assert_eq!(normalize_handle("@@jack").as_deref(), Some("jack"));
        assert_eq!(normalize_handle("jack").as_deref(), Some("jack"));
        assert_eq!(normalize_handle("   "), None);
    }
}
