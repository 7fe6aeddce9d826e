//! Shopify cursor-based pagination via the `Link` response header.
//!
//! Each Admin API page response carries a `Link` header with URLs for the
//! adjacent pages. The next URL already encodes the `page_info` cursor and
//! the page size, and must be requested as-is.
//!
//! ## Header format
//!
//! Single next link:
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=CURSOR>; rel="next"
//! ```
//!
//! Combined previous and next:
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```
//!
//! A missing or malformed next link ends pagination; it is not an error.

/// Parses a `Link` header value and returns the absolute URL of the
/// `rel="next"` page.
///
/// Returns `None` if:
/// - `link_header` is `None` (no header was present),
/// - there is no `rel="next"` segment (last page reached),
/// - the next segment has no `<...>` URL, or the URL is not absolute.
#[must_use]
pub fn extract_next_url(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    for segment in header.split(',') {
        let segment = segment.trim();

        if !is_next_relation(segment) {
            continue;
        }

        let url = extract_angle_bracket_url(segment)?;
        return reqwest::Url::parse(url)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .map(|u| u.to_string());
    }

    None
}

/// Returns `true` for `rel="next"` or `rel=next`.
fn is_next_relation(segment: &str) -> bool {
    segment.split(';').skip(1).any(|param| {
        let param = param.trim();
        param
            .strip_prefix("rel=")
            .is_some_and(|v| v.trim_matches('"') == "next")
    })
}

/// Extracts the URL between `<` and `>` in a link directive segment.
fn extract_angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    if start >= end {
        return None;
    }
    Some(&segment[start..end])
}
