//! HTTP client for the Shopify Admin REST `products.json` endpoint.

mod fetch_all;
mod origin;

use std::time::Duration;

use orderdesk_core::AppConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use crate::error::ShopifyError;
use crate::pagination::extract_next_url;
use crate::throttle::{CallLimit, CALL_LIMIT_HEADER};
use crate::types::{ShopifyProduct, ShopifyProductsResponse};

pub use origin::extract_store_origin;
#[cfg(test)]
use origin::extract_domain;

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
pub(super) const MAX_PAGES: usize = 200;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Connection settings for [`ShopifyAdminClient`].
#[derive(Clone)]
pub struct ShopifyClientConfig {
    /// Store URL, e.g. `https://my-store.myshopify.com`. A bare host is
    /// accepted and treated as https.
    pub store_url: String,
    pub access_token: String,
    /// Admin API version segment, e.g. `2024-01`.
    pub api_version: String,
    pub page_limit: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Pause once the call bucket is within this many calls of full.
    pub call_limit_margin: u32,
    pub throttle_secs: u64,
}

impl std::fmt::Debug for ShopifyClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyClientConfig")
            .field("store_url", &self.store_url)
            .field("access_token", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("page_limit", &self.page_limit)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("call_limit_margin", &self.call_limit_margin)
            .field("throttle_secs", &self.throttle_secs)
            .finish()
    }
}

impl ShopifyClientConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            store_url: config.shopify_store_url.clone(),
            access_token: config.shopify_access_token.clone(),
            api_version: config.shopify_api_version.clone(),
            page_limit: config.shopify_page_limit,
            timeout_secs: config.shopify_request_timeout_secs,
            user_agent: config.shopify_user_agent.clone(),
            call_limit_margin: config.shopify_call_limit_margin,
            throttle_secs: config.shopify_throttle_secs,
        }
    }
}

/// One page of the products listing.
#[derive(Debug)]
pub struct ProductsPage {
    pub products: Vec<ShopifyProduct>,
    /// Absolute URL of the next page, if the `Link` header named one.
    pub next_url: Option<String>,
    pub call_limit: Option<CallLimit>,
}

/// HTTP client for the Admin API products listing.
///
/// Handles rate limiting (429), rejected tokens (401/403), not-found (404)
/// and other non-2xx responses as typed errors. Nothing is retried: a
/// failed page aborts the whole fetch.
pub struct ShopifyAdminClient {
    pub(super) client: Client,
    pub(super) store_origin: String,
    pub(super) config: ShopifyClientConfig,
}

impl std::fmt::Debug for ShopifyAdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminClient")
            .field("store_origin", &self.store_origin)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ShopifyAdminClient {
    /// Creates a client that sends the access token on every request.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::InvalidStoreUrl`] if the store URL has no usable origin.
    /// - [`ShopifyError::InvalidAccessToken`] if the token is not a valid header value.
    /// - [`ShopifyError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(config: ShopifyClientConfig) -> Result<Self, ShopifyError> {
        let store_origin = extract_store_origin(&config.store_url)?;

        let mut token = HeaderValue::from_str(&config.access_token)
            .map_err(|_| ShopifyError::InvalidAccessToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            store_origin,
            config,
        })
    }

    /// URL of the first products page:
    /// `{origin}/admin/api/{version}/products.json?limit={page_limit}`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidStoreUrl`] if the resulting URL does not parse.
    pub fn products_url(&self) -> Result<String, ShopifyError> {
        let base = format!(
            "{}/admin/api/{}/products.json",
            self.store_origin, self.config.api_version
        );
        let mut url = reqwest::Url::parse(&base).map_err(|e| ShopifyError::InvalidStoreUrl {
            store_url: self.config.store_url.clone(),
            reason: format!("\"{base}\" is not a valid URL: {e}"),
        })?;
        url.query_pairs_mut()
            .append_pair("limit", &self.config.page_limit.to_string());
        Ok(url.to_string())
    }

    /// Fetches one page from `url`, which is either [`Self::products_url`]
    /// or a `next_url` returned by a previous page.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] on HTTP 429.
    /// - [`ShopifyError::Unauthorized`] on HTTP 401 or 403.
    /// - [`ShopifyError::NotFound`] on HTTP 404.
    /// - [`ShopifyError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ShopifyError::Http`] on network or TLS failure.
    /// - [`ShopifyError::Deserialize`] if the body is not a products listing.
    pub async fn fetch_products_page(&self, url: &str) -> Result<ProductsPage, ShopifyError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ShopifyError::RateLimited {
                domain: origin::extract_domain(&self.store_origin),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ShopifyError::Unauthorized {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        // Read headers before consuming the body.
        let next_url = extract_next_url(
            response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok()),
        );
        let call_limit = response
            .headers()
            .get(CALL_LIMIT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(CallLimit::parse);

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ShopifyProductsResponse>(&body).map_err(|e| {
            ShopifyError::Deserialize {
                context: format!("products page {url}"),
                source: e,
            }
        })?;

        Ok(ProductsPage {
            products: parsed.products,
            next_url,
            call_limit,
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
