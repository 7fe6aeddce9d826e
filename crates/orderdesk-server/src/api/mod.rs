mod auth;
mod catalog;
mod error;
mod order;

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use orderdesk_core::{AppConfig, Catalog, CredentialsFile, Environment};
use orderdesk_sheets::SheetsClient;
use orderdesk_shopify::ShopifyAdminClient;
use serde::Serialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, require_login, RequestId};
use crate::session;

pub use error::AppError;

/// Shared handles for every request.
///
/// The catalog is fetched once and swapped wholesale on refresh. The set of
/// known order numbers is the last read of the worksheet and only feeds the
/// order-number preview; submissions regenerate the number from a fresh read.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: Arc<CredentialsFile>,
    pub shopify: Arc<ShopifyAdminClient>,
    pub sheets: Arc<SheetsClient>,
    catalog: Arc<RwLock<Arc<Catalog>>>,
    known_order_numbers: Arc<RwLock<HashSet<String>>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        credentials: CredentialsFile,
        shopify: ShopifyAdminClient,
        sheets: SheetsClient,
        catalog: Catalog,
        known_order_numbers: HashSet<String>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            credentials: Arc::new(credentials),
            shopify: Arc::new(shopify),
            sheets: Arc::new(sheets),
            catalog: Arc::new(RwLock::new(Arc::new(catalog))),
            known_order_numbers: Arc::new(RwLock::new(known_order_numbers)),
        }
    }

    pub async fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&*self.catalog.read().await)
    }

    pub async fn replace_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = Arc::new(catalog);
    }

    pub async fn known_order_numbers(&self) -> HashSet<String> {
        self.known_order_numbers.read().await.clone()
    }

    pub async fn replace_known_order_numbers(&self, numbers: HashSet<String>) {
        *self.known_order_numbers.write().await = numbers;
    }
}

/// Calendar date order numbers and default ship-by dates are based on.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog_records: usize,
}

fn order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(order::order_page))
        .route("/department", post(order::select_department))
        .route("/items", post(order::add_item))
        .route("/items/{index}/remove", post(order::remove_item))
        .route("/submit", post(order::submit))
        .route("/catalog/refresh", post(catalog::refresh))
        .route_layer(axum::middleware::from_fn(require_login))
}

pub fn build_app(state: AppState) -> Router {
    let secure = matches!(state.config.env, Environment::Production);
    let sessions = session::layer(&state.credentials.cookie, secure);

    let public_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout));

    Router::new()
        .merge(public_routes)
        .merge(order_router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(sessions),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let catalog_records = state.catalog().await.len();

    if catalog_records == 0 {
        tracing::warn!("health check: catalog is empty");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    catalog_records,
                },
                meta,
            }),
        );
    }

    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                catalog_records,
            },
            meta,
        }),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
