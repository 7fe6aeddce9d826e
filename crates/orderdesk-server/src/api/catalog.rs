use axum::{extract::State, response::Redirect};
use tower_sessions::Session;

use super::{AppError, AppState};
use crate::session;

/// Re-fetches the product catalog and the recorded order numbers.
///
/// The previous catalog stays in place when the fetch fails.
pub(super) async fn refresh(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let catalog = state.shopify.fetch_catalog().await?;
    let records = catalog.len();
    state.replace_catalog(catalog).await;

    let table = state.sheets.read_table(&state.config.sheets_worksheet).await?;
    state.replace_known_order_numbers(table.order_numbers()?).await;

    tracing::info!(records, "catalog refreshed");
    session::set_notice(&session, format!("Catalog refreshed: {records} sku(s) loaded")).await?;
    Ok(Redirect::to("/"))
}
