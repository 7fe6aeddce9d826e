//! Shopify Admin API response types for `GET /admin/api/{version}/products.json`.
//!
//! ## Observed shape
//!
//! ### Tags
//! The Admin REST API returns tags as a single **comma-separated string**
//! (`"Marketing, Gift"`), while the public storefront `products.json`
//! returns a JSON array. [`RawTags`] accepts both and joins arrays back into
//! the comma-separated form the catalog works with.
//!
//! ### `status`
//! One of `"active"`, `"archived"`, `"draft"`. Always present on the Admin API.
//!
//! ### `inventory_quantity` on variants
//! Signed integer. Goes negative when a store allows overselling; the
//! catalog clamps it to zero during flattening. Absent on stores that do
//! not track inventory; treated as `0`.
//!
//! ### `sku` on variants
//! `null` or `""` when the merchant never assigned one. Such variants are
//! not orderable and are dropped by the catalog.

use serde::Deserialize;

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductsResponse {
    pub products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    /// Shopify numeric product ID.
    pub id: i64,

    pub title: String,

    /// Publication status: `"active"`, `"archived"` or `"draft"`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub tags: RawTags,

    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyVariant {
    /// Shopify numeric variant ID.
    pub id: i64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

/// Product tags in either wire format.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    Joined(String),
    List(Vec<String>),
}

impl Default for RawTags {
    fn default() -> Self {
        RawTags::Joined(String::new())
    }
}

impl RawTags {
    /// Tags as one comma-separated string.
    #[must_use]
    pub fn into_joined(self) -> String {
        match self {
            RawTags::Joined(s) => s,
            RawTags::List(list) => list.join(", "),
        }
    }
}
