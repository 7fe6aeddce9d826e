use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use orderdesk_core::order::SubmissionForm;
use orderdesk_core::{
    generate_order_number, validate_submission, Department, OrderDraft, Priority, ShippingMethod,
    SHEET_COLUMNS,
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{today, AppError, AppState};
use crate::session::{self, SessionUser};
use crate::views::{
    render, LineView, OrderTemplate, SelectOption, SkuOption, SubmittedTemplate,
};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProductQuery {
    product: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DepartmentForm {
    department: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AddItemForm {
    title: Option<String>,
    sku: Option<String>,
    #[serde(default)]
    quantity: String,
}

/// Everything the order page shows besides the session's own draft.
struct PageState {
    selected_title: Option<String>,
    form: SubmissionForm,
    warning: Option<String>,
    notice: Option<String>,
}

async fn render_form(
    state: &AppState,
    status: StatusCode,
    user: &SessionUser,
    draft: &OrderDraft,
    page: PageState,
) -> Response {
    let catalog = state.catalog().await;
    let tag = state.config.restricted_tag.as_str();
    let department = draft.department;

    let visible_titles = catalog.titles_for(department, tag);
    let selected_title = page
        .selected_title
        .filter(|title| visible_titles.iter().any(|t| t == title));
    let titles = visible_titles
        .iter()
        .map(|t| SelectOption::new(t, t, selected_title.as_deref() == Some(t.as_str())))
        .collect();
    let skus = selected_title
        .as_deref()
        .map(|title| {
            catalog
                .visible_to(department, tag)
                .filter(|r| r.title == title)
                .map(|r| SkuOption {
                    sku: r.sku.clone(),
                    in_stock: r.in_stock,
                    max_orderable: r.max_orderable(),
                })
                .collect()
        })
        .unwrap_or_default();

    let known = state.known_order_numbers().await;
    let order_number_preview = generate_order_number(department, today(), &known);

    let form = page.form;
    let template = OrderTemplate {
        user_name: user.display_name().to_string(),
        department: department.label().to_string(),
        departments: Department::ALL
            .iter()
            .map(|d| SelectOption::new(d.label(), d.label(), *d == department))
            .collect(),
        titles,
        selected_title,
        skus,
        lines: draft
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| LineView {
                index,
                title: line.title.clone(),
                sku: line.sku.clone(),
                quantity: line.quantity,
            })
            .collect(),
        total_quantity: draft.total_quantity(),
        channel: draft.channel().sheet_label(),
        order_number_preview,
        shipping_methods: ShippingMethod::ALL
            .iter()
            .map(|m| SelectOption::new(m.label(), m.label(), form.shipping_method == m.label()))
            .collect(),
        priorities: Priority::ALL
            .iter()
            .map(|p| {
                SelectOption::new(
                    p.label(),
                    p.label(),
                    form.priority.eq_ignore_ascii_case(p.label()),
                )
            })
            .collect(),
        form,
        warning: page.warning,
        notice: page.notice,
        catalog_size: catalog.len(),
    };
    render(status, &template)
}

pub(super) async fn order_page(
    State(state): State<AppState>,
    session: Session,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<ProductQuery>,
) -> Result<Response, AppError> {
    let draft = session::load_draft(&session).await?;
    let notice = session::take_notice(&session).await?;
    Ok(render_form(
        &state,
        StatusCode::OK,
        &user,
        &draft,
        PageState {
            selected_title: query.product.filter(|p| !p.trim().is_empty()),
            form: SubmissionForm::default(),
            warning: None,
            notice,
        },
    )
    .await)
}

pub(super) async fn select_department(
    State(state): State<AppState>,
    session: Session,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<DepartmentForm>,
) -> Result<Response, AppError> {
    let mut draft = session::load_draft(&session).await?;
    let department = match form.department.parse::<Department>() {
        Ok(department) => department,
        Err(e) => {
            return Ok(render_form(
                &state,
                StatusCode::UNPROCESSABLE_ENTITY,
                &user,
                &draft,
                PageState {
                    selected_title: None,
                    form: SubmissionForm::default(),
                    warning: Some(e.to_string()),
                    notice: None,
                },
            )
            .await);
        }
    };

    let catalog = state.catalog().await;
    let dropped = draft.set_department(department, &catalog, &state.config.restricted_tag);
    session::save_draft(&session, &draft).await?;
    if dropped > 0 {
        session::set_notice(
            &session,
            format!(
                "Removed {dropped} item(s) not available to the {department} department"
            ),
        )
        .await?;
    }
    tracing::debug!(department = %department, dropped, "department selected");
    Ok(Redirect::to("/").into_response())
}

pub(super) async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<AddItemForm>,
) -> Result<Response, AppError> {
    let mut draft = session::load_draft(&session).await?;
    let catalog = state.catalog().await;

    let added = draft
        .add_line(
            &catalog,
            &state.config.restricted_tag,
            form.title.as_deref(),
            form.sku.as_deref(),
            &form.quantity,
        )
        .map(|line| format!("Added {} x {}", line.quantity, line.sku));

    match added {
        Ok(notice) => {
            session::save_draft(&session, &draft).await?;
            session::set_notice(&session, notice).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::debug!(error = %e, "rejected order line");
            Ok(render_form(
                &state,
                StatusCode::UNPROCESSABLE_ENTITY,
                &user,
                &draft,
                PageState {
                    selected_title: form.title,
                    form: SubmissionForm::default(),
                    warning: Some(e.to_string()),
                    notice: None,
                },
            )
            .await)
        }
    }
}

pub(super) async fn remove_item(
    session: Session,
    Path(index): Path<usize>,
) -> Result<Redirect, AppError> {
    let mut draft = session::load_draft(&session).await?;
    match draft.remove_line(index) {
        Ok(line) => {
            session::save_draft(&session, &draft).await?;
            session::set_notice(&session, format!("Removed {} x {}", line.quantity, line.sku))
                .await?;
        }
        Err(e) => session::set_notice(&session, e.to_string()).await?,
    }
    Ok(Redirect::to("/"))
}

pub(super) async fn submit(
    State(state): State<AppState>,
    session: Session,
    Extension(user): Extension<SessionUser>,
    Form(form): Form<SubmissionForm>,
) -> Result<Response, AppError> {
    let mut draft = session::load_draft(&session).await?;
    let date = today();

    let validated = match validate_submission(&form, &draft.lines, date) {
        Ok(validated) => validated,
        Err(e) => {
            tracing::debug!(error = %e, "rejected submission");
            return Ok(render_form(
                &state,
                StatusCode::UNPROCESSABLE_ENTITY,
                &user,
                &draft,
                PageState {
                    selected_title: None,
                    form,
                    warning: Some(e.to_string()),
                    notice: None,
                },
            )
            .await);
        }
    };

    let department = draft.department;
    let origin = state.config.origin_facility.as_str();
    let lines = draft.lines.as_slice();
    let (header, known) = state
        .sheets
        .append_order(&state.config.sheets_worksheet, &SHEET_COLUMNS, |existing| {
            let number = generate_order_number(department, date, existing);
            let header = validated.with_order_number(number);
            let rows = header.rows(lines, origin);
            let mut known = existing.clone();
            known.insert(header.order_number.clone());
            ((header, known), rows)
        })
        .await?;

    tracing::info!(
        order_number = %header.order_number,
        username = %user.username,
        lines = draft.lines.len(),
        channel = header.channel.sheet_label(),
        "order submitted"
    );

    let submitted = SubmittedTemplate {
        user_name: user.display_name().to_string(),
        order_number: header.order_number,
        channel: header.channel.sheet_label(),
        line_count: draft.lines.len(),
        total_quantity: draft.total_quantity(),
    };

    state.replace_known_order_numbers(known).await;
    draft.clear();
    session::save_draft(&session, &draft).await?;

    Ok(render(StatusCode::OK, &submitted))
}
