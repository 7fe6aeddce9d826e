use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::order::Department;

/// Publication status of the parent product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    /// Any other Shopify status (`"draft"`, `"archived"`, ...), kept verbatim.
    Other(String),
}

impl ProductStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("active") {
            ProductStatus::Active
        } else {
            ProductStatus::Other(raw.to_string())
        }
    }
}

/// One variant of a product, flattened together with the parent fields the
/// order form needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub sku: String,
    /// Parent product title.
    pub title: String,
    pub in_stock: u64,
    /// Parent tags as Shopify returns them: a comma-separated string.
    pub tags: String,
    pub status: ProductStatus,
}

impl ProductRecord {
    /// Individual tags split on `,` or `;`, trimmed, empties dropped.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags
            .split([',', ';'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Largest quantity a single order line may request for this sku:
    /// 10% of recorded stock, rounded down.
    #[must_use]
    pub fn max_orderable(&self) -> u64 {
        self.in_stock / 10
    }
}

/// Active, orderable product records for one form session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    /// Builds a catalog keeping only active records that carry a sku.
    #[must_use]
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        let total = records.len();
        let records: Vec<ProductRecord> = records
            .into_iter()
            .filter(|r| r.status == ProductStatus::Active && !r.sku.trim().is_empty())
            .collect();
        tracing::debug!(
            total,
            kept = records.len(),
            "filtered product records to active skus"
        );
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records visible to `department`. Restricted departments only see
    /// records tagged with `restricted_tag`.
    pub fn visible_to<'a>(
        &'a self,
        department: Department,
        restricted_tag: &'a str,
    ) -> impl Iterator<Item = &'a ProductRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| !department.is_restricted() || r.has_tag(restricted_tag))
    }

    /// Sorted distinct product titles visible to `department`.
    #[must_use]
    pub fn titles_for(&self, department: Department, restricted_tag: &str) -> Vec<String> {
        self.visible_to(department, restricted_tag)
            .map(|r| r.title.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Skus belonging to the product `title`, in catalog order.
    #[must_use]
    pub fn skus_for(&self, title: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.title == title)
            .map(|r| r.sku.as_str())
            .collect()
    }

    #[must_use]
    pub fn find(&self, title: &str, sku: &str) -> Option<&ProductRecord> {
        self.records
            .iter()
            .find(|r| r.title == title && r.sku == sku)
    }
}
