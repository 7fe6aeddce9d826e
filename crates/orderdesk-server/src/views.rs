//! HTML templates for the order form.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use orderdesk_core::order::SubmissionForm;

pub const LOGIN_PROMPT: &str = "Please enter your username and password";
pub const LOGIN_FAILED: &str = "Username/Password is incorrect";

/// One `<option>` of a select box.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// A sku choice with its stock figures.
#[derive(Debug, Clone)]
pub struct SkuOption {
    pub sku: String,
    pub in_stock: u64,
    pub max_orderable: u64,
}

/// A pending order line with its position for removal.
#[derive(Debug, Clone)]
pub struct LineView {
    pub index: usize,
    pub title: String,
    pub sku: String,
    pub quantity: u32,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub prompt: Option<&'static str>,
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "order.html")]
pub struct OrderTemplate {
    pub user_name: String,
    pub department: String,
    pub departments: Vec<SelectOption>,
    pub titles: Vec<SelectOption>,
    pub selected_title: Option<String>,
    pub skus: Vec<SkuOption>,
    pub lines: Vec<LineView>,
    pub total_quantity: u64,
    pub channel: &'static str,
    pub order_number_preview: String,
    pub shipping_methods: Vec<SelectOption>,
    pub priorities: Vec<SelectOption>,
    pub form: SubmissionForm,
    pub warning: Option<String>,
    pub notice: Option<String>,
    pub catalog_size: usize,
}

#[derive(Template)]
#[template(path = "submitted.html")]
pub struct SubmittedTemplate {
    pub user_name: String,
    pub order_number: String,
    pub channel: &'static str,
    pub line_count: usize,
    pub total_quantity: u64,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: &'static str,
    pub message: String,
}

/// Renders `template` with `status`, falling back to plain text when
/// rendering fails.
pub fn render<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render template");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error rendering template",
            )
                .into_response()
        }
    }
}
