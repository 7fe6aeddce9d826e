use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orderdesk_sheets::SheetsError;
use orderdesk_shopify::ShopifyError;
use thiserror::Error;

use crate::views::{render, ErrorTemplate};

/// Failures a handler cannot turn into a form warning.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Sheets(_) | AppError::Shopify(_) => StatusCode::BAD_GATEWAY,
            AppError::Session(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page(&self) -> ErrorTemplate {
        match self {
            AppError::Sheets(_) => ErrorTemplate {
                title: "Order not recorded",
                message: "The order sheet could not be updated. Your items are still pending; try submitting again.".to_string(),
            },
            AppError::Shopify(_) => ErrorTemplate {
                title: "Catalog unavailable",
                message: "Products could not be loaded from Shopify. Try again shortly.".to_string(),
            },
            AppError::Session(_) | AppError::Task(_) => ErrorTemplate {
                title: "Something went wrong",
                message: "The request could not be completed.".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        render(self.status(), &self.page())
    }
}
