//! URL Utility Functions
//!
//! Validation, canonicalization, hostname classification, and relative URL
//! resolution for the page and thumbnail URLs handled by the resolver.

use url::Url;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// Protocol-relative URLs (`//cdn.example.com/a.jpg`) inherit the base scheme.
///
/// # Arguments
/// * `url_str` - The URL to resolve (can be relative or absolute)
/// * `base` - The base URL for resolution
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    // Preserve special URLs unchanged
    if url_str.starts_with("data:") {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Parse and canonicalize user input.
///
/// Returns the serialized [`Url`] (lowercased host, default path `/`) for
/// parseable input, or the trimmed input unchanged.
#[must_use]
pub fn canonicalize(url_str: &str) -> String {
    let trimmed = url_str.trim();
    match Url::parse(trimmed) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Extract the hostname from a URL, as written (no `www.` stripping).
#[must_use]
pub fn extract_hostname(url_str: &str) -> Option<String> {
    Url::parse(url_str.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
}

/// Hostname lowercased with a leading `www.` removed, used for domain lists.
#[must_use]
pub fn normalized_host(url_str: &str) -> Option<String> {
    let host = extract_hostname(url_str)?.to_ascii_lowercase();
    let host = host.trim_end_matches('.');
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Whether `host` equals `domain` or is a subdomain of it.
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Whether the URL's normalized host matches any domain in `domains`.
///
/// Malformed URLs never match.
#[must_use]
pub fn host_in(url_str: &str, domains: &[&str]) -> bool {
    normalized_host(url_str)
        .is_some_and(|host| domains.iter().any(|domain| host_matches(&host, domain)))
}

/// Title used when nothing better is known: the hostname, or the trimmed
/// input for URLs without one.
#[must_use]
pub fn fallback_title(url_str: &str) -> String {
    if let Some(host) = extract_hostname(url_str) {
        return host;
    }
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://example.com/a").0);
        assert!(is_absolute_url("http://example.com").0);
        assert!(!is_absolute_url("/relative/path").0);
        assert!(!is_absolute_url("ftp://example.com").0);
        assert!(!is_absolute_url("").0);
    }

    #[test]
    fn test_create_absolute_url() {
        let base = Url::parse("https://example.com/blog/post").unwrap();
        assert_eq!(
            create_absolute_url("/img/a.jpg", &base),
            "https://example.com/img/a.jpg"
        );
        assert_eq!(
            create_absolute_url("//cdn.example.com/a.jpg", &base),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(
            create_absolute_url("https://other.com/b.png", &base),
            "https://other.com/b.png"
        );
        assert_eq!(create_absolute_url("data:image/png;base64,AA", &base), "data:image/png;base64,AA");
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize(" https://EXAMPLE.com "), "https://example.com/");
        assert_eq!(canonicalize("not a url"), "not a url");
    }

    #[test]
    fn test_extract_hostname() {
        assert_eq!(
            extract_hostname("https://www.example.com/path"),
            Some("www.example.com".to_string())
        );
        assert_eq!(extract_hostname("not a url"), None);
    }

    #[test]
    fn test_normalized_host_strips_www() {
        assert_eq!(
            normalized_host("https://WWW.YouTube.com/watch?v=1"),
            Some("youtube.com".to_string())
        );
    }

    #[test]
    fn test_host_matches_subdomains_only_on_label_boundary() {
        assert!(host_matches("youtube.com", "youtube.com"));
        assert!(host_matches("m.youtube.com", "youtube.com"));
        assert!(!host_matches("notyoutube.com", "youtube.com"));
    }

    #[test]
    fn test_host_in() {
        assert!(host_in("https://x.com/user/status/1", &["twitter.com", "x.com"]));
        assert!(!host_in("https://example.com", &["twitter.com", "x.com"]));
        assert!(!host_in("::garbage::", &["x.com"]));
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(
            fallback_title("https://this-domain-does-not-exist.invalid/x"),
            "this-domain-does-not-exist.invalid"
        );
        assert_eq!(fallback_title("not a url"), "not a url");
        assert_eq!(fallback_title("   "), "untitled");
    }
}
