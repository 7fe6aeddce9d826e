//! `catalog` command: fetch products from Shopify and list orderable skus.

use orderdesk_core::{Catalog, Department, ProductRecord};
use orderdesk_shopify::{ShopifyAdminClient, ShopifyClientConfig};

/// Fetches the catalog and prints one line per sku.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the fetch fails.
pub(crate) async fn run_catalog(department: Option<Department>) -> anyhow::Result<()> {
    let config = orderdesk_core::load_app_config()?;
    let client = ShopifyAdminClient::new(ShopifyClientConfig::from_app_config(&config))
        .map_err(|e| anyhow::anyhow!("failed to build Shopify client: {e}"))?;
    let catalog = client.fetch_catalog().await?;

    let lines = catalog_lines(&catalog, department, &config.restricted_tag);
    println!("{:<24} {:>8} {:>6}  TITLE", "SKU", "STOCK", "MAX");
    for line in &lines {
        println!("{line}");
    }
    println!("{} sku(s)", lines.len());
    Ok(())
}

fn format_record(record: &ProductRecord) -> String {
    format!(
        "{:<24} {:>8} {:>6}  {}",
        record.sku,
        record.in_stock,
        record.max_orderable(),
        record.title
    )
}

/// Formatted rows for every record `department` may order, or for the
/// whole catalog when no department is given.
fn catalog_lines(catalog: &Catalog, department: Option<Department>, tag: &str) -> Vec<String> {
    match department {
        Some(d) => catalog.visible_to(d, tag).map(format_record).collect(),
        None => catalog.records().iter().map(format_record).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::ProductStatus;

    fn record(sku: &str, title: &str, stock: u64, tags: &str) -> ProductRecord {
        ProductRecord {
            sku: sku.to_string(),
            title: title.to_string(),
            in_stock: stock,
            tags: tags.to_string(),
            status: ProductStatus::Active,
        }
    }

    #[test]
    fn format_record_shows_stock_and_order_cap() {
        let line = format_record(&record("STK-1", "Sticker Pack", 95, "Marketing"));
        assert!(line.starts_with("STK-1"));
        assert!(line.contains(" 95 "));
        assert!(line.contains(" 9  Sticker Pack"));
    }

    #[test]
    fn department_filter_applies_restricted_tag() {
        let catalog = Catalog::from_records(vec![
            record("STK-1", "Sticker Pack", 100, "Marketing"),
            record("TNR-1", "Toner", 100, "Retail"),
        ]);

        assert_eq!(catalog_lines(&catalog, None, "Marketing").len(), 2);
        assert_eq!(
            catalog_lines(&catalog, Some(Department::Operations), "Marketing").len(),
            2
        );
        let restricted = catalog_lines(&catalog, Some(Department::Sales), "Marketing");
        assert_eq!(restricted.len(), 1);
        assert!(restricted[0].starts_with("STK-1"));
    }
}
