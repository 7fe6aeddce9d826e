//! Store URL normalization for the Admin API client.

use crate::error::ShopifyError;

/// Reduces a configured store URL to its scheme+host origin.
///
/// `"https://my-store.myshopify.com/admin"` becomes
/// `"https://my-store.myshopify.com"`. A bare host such as
/// `"my-store.myshopify.com"` is treated as https.
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidStoreUrl`] if no host can be parsed.
pub fn extract_store_origin(store_url: &str) -> Result<String, ShopifyError> {
    let trimmed = store_url.trim().trim_end_matches('/');
    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = reqwest::Url::parse(&candidate).map_err(|e| ShopifyError::InvalidStoreUrl {
        store_url: store_url.to_owned(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ShopifyError::InvalidStoreUrl {
            store_url: store_url.to_owned(),
            reason: "expected an http(s) URL with a host".to_owned(),
        });
    }

    Ok(url.origin().ascii_serialization())
}

/// Hostname of a URL for error messages. Falls back to the input.
pub(super) fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
