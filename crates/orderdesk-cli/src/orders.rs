//! `order-number` command: preview the next order number from the sheet.

use chrono::NaiveDate;
use orderdesk_core::{generate_order_number, Department};
use orderdesk_sheets::SheetsClient;

/// Reads the configured worksheet and prints the next free order number for
/// `department` on `date` (today when `None`).
///
/// Nothing is reserved: a submission made before this number is used will
/// take it first.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the sheet cannot be read,
/// or it has no order number column.
pub(crate) async fn run_order_number(
    department: Department,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let config = orderdesk_core::load_app_config()?;
    let sheets = SheetsClient::from_app_config(&config)?;
    let table = sheets.read_table(&config.sheets_worksheet).await?;
    let existing = table.order_numbers()?;

    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let number = generate_order_number(department, date, &existing);
    tracing::debug!(
        worksheet = %config.sheets_worksheet,
        recorded = existing.len(),
        "computed next order number"
    );
    println!("{number}");
    Ok(())
}
