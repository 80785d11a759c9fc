use url::Url;

/// Extracts the lowercase host from a URL string
///
/// Returns None when the string does not parse or has no host. The host is the
/// key the rate limiter uses for per-host intervals.
///
/// # Examples
///
/// ```
/// use gleaner::url::extract_host;
///
/// assert_eq!(extract_host("https://EXAMPLE.COM/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("https://example.com:8080/"), Some("example.com".to_string()));
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}
