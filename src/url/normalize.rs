use url::Url;

/// Schemes that never point at a crawlable page
const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves an `href` value to an absolute URL
///
/// # Resolution Rules
///
/// 1. Absolute `http://` / `https://` links are kept as they are
/// 2. Scheme-relative links (`//host/path`) are promoted to `https:`
/// 3. Root-relative (`/path`) and relative (`path`) links are joined onto `base_url`
/// 4. `javascript:`, `mailto:`, `tel:`, `data:` and fragment-only links are dropped
///
/// The fragment is removed from every result so `page#a` and `page#b` resolve
/// to the same URL.
///
/// # Arguments
///
/// * `href` - The raw attribute value
/// * `base_url` - The URL relative links are resolved against
///
/// # Returns
///
/// * `Some(String)` - The absolute URL
/// * `None` - The link should be ignored or could not be resolved
///
/// # Examples
///
/// ```
/// use gleaner::url::normalize_link;
///
/// assert_eq!(
///     normalize_link("/products", "https://example.com"),
///     Some("https://example.com/products".to_string())
/// );
/// assert_eq!(
///     normalize_link("//cdn.example.com/app", "http://example.com"),
///     Some("https://cdn.example.com/app".to_string())
/// );
/// assert_eq!(normalize_link("mailto:me@example.com", "https://example.com"), None);
/// ```
pub fn normalize_link(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let mut resolved = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        Url::parse(href).ok()?
    } else if href.starts_with("//") {
        Url::parse(&format!("https:{}", href)).ok()?
    } else {
        let base = Url::parse(base_url).ok()?;
        base.join(href).ok()?
    };

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved.to_string())
}
