mod api;
mod middleware;
mod session;
mod views;

use std::collections::HashSet;

use orderdesk_core::Catalog;
use orderdesk_sheets::SheetsClient;
use orderdesk_shopify::ShopifyAdminClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = orderdesk_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let credentials = orderdesk_core::load_credentials(&config.credentials_path)?;
    tracing::info!(
        users = credentials.user_count(),
        preauthorized = credentials.preauthorized.emails.len(),
        "loaded credentials"
    );
    tracing::debug!(emails = ?credentials.preauthorized.emails, "preauthorized emails");

    let shopify = ShopifyAdminClient::new(orderdesk_shopify::ShopifyClientConfig::from_app_config(
        &config,
    ))?;
    let catalog = match shopify.fetch_catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load product catalog; starting with an empty catalog");
            Catalog::default()
        }
    };

    let sheets = SheetsClient::from_app_config(&config)?;
    let known_order_numbers = match sheets.read_table(&config.sheets_worksheet).await {
        Ok(table) => table.order_numbers().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "order sheet has no order number column");
            HashSet::new()
        }),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read order sheet");
            HashSet::new()
        }
    };

    let bind_addr = config.bind_addr;
    let app = build_app(AppState::new(
        config,
        credentials,
        shopify,
        sheets,
        catalog,
        known_order_numbers,
    ));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "order desk listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
