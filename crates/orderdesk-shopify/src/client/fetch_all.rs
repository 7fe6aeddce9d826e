//! Multi-page product fetch loop for `ShopifyAdminClient`.

use std::time::Duration;

use orderdesk_core::Catalog;

use crate::error::ShopifyError;
use crate::flatten::flatten_products;
use crate::throttle::pause_if_near_limit;
use crate::types::ShopifyProduct;

use super::ShopifyAdminClient;
use super::MAX_PAGES;

impl ShopifyAdminClient {
    /// Fetches every product by following `rel="next"` links until none is
    /// left.
    ///
    /// Before each follow-up request the call-limit header of the previous
    /// response is checked; when the bucket is within `call_limit_margin`
    /// calls of full the loop sleeps for `throttle_secs`.
    ///
    /// A missing or malformed next link ends the loop with the products
    /// collected so far. Any failed request aborts the fetch and discards
    /// earlier pages.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`].
    /// Returns [`ShopifyError::PaginationLimit`] if the number of pages exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_all_products(&self) -> Result<Vec<ShopifyProduct>, ShopifyError> {
        let mut all_products: Vec<ShopifyProduct> = Vec::new();
        let mut next_url = Some(self.products_url()?);
        let mut last_call_limit = None;
        let mut page_count = 0usize;
        let pause = Duration::from_secs(self.config.throttle_secs);

        while let Some(url) = next_url.take() {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    store_url: self.store_origin.clone(),
                    max_pages: MAX_PAGES,
                });
            }

            pause_if_near_limit(last_call_limit, self.config.call_limit_margin, pause).await;

            let page = self.fetch_products_page(&url).await?;
            tracing::debug!(
                page = page_count,
                products = page.products.len(),
                has_next = page.next_url.is_some(),
                "fetched shopify products page"
            );

            all_products.extend(page.products);
            last_call_limit = page.call_limit;
            next_url = page.next_url;
        }

        Ok(all_products)
    }

    /// Fetches all products and builds the orderable [`Catalog`] from them.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_all_products`].
    pub async fn fetch_catalog(&self) -> Result<Catalog, ShopifyError> {
        let products = self.fetch_all_products().await?;
        let product_count = products.len();
        let catalog = Catalog::from_records(flatten_products(products));
        tracing::info!(
            store = %self.store_origin,
            products = product_count,
            orderable_variants = catalog.len(),
            "loaded shopify catalog"
        );
        Ok(catalog)
    }
}
