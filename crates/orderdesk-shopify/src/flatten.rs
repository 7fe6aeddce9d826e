//! Flattening from nested Shopify products into one [`ProductRecord`] per
//! variant.

use orderdesk_core::{ProductRecord, ProductStatus};

use crate::types::ShopifyProduct;

/// Flattens products into variant-level records carrying the parent title,
/// tags and status.
///
/// Negative inventory clamps to `0`; a missing sku becomes an empty string
/// (the catalog drops those). Products without variants yield nothing.
#[must_use]
pub fn flatten_products(products: Vec<ShopifyProduct>) -> Vec<ProductRecord> {
    let mut records = Vec::new();

    for product in products {
        let status = ProductStatus::parse(product.status.as_deref().unwrap_or("active"));
        let tags = product.tags.into_joined();

        if product.variants.is_empty() {
            tracing::debug!(product_id = product.id, "product has no variants; skipping");
            continue;
        }

        for variant in product.variants {
            let in_stock = variant
                .inventory_quantity
                .map_or(0, |q| u64::try_from(q).unwrap_or(0));
            records.push(ProductRecord {
                sku: variant.sku.unwrap_or_default().trim().to_string(),
                title: product.title.clone(),
                in_stock,
                tags: tags.clone(),
                status: status.clone(),
            });
        }
    }

    records
}
