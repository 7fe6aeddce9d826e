use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{AppError, AppState};
use crate::session::{self, SessionUser};
use crate::views::{render, LoginTemplate, LOGIN_FAILED, LOGIN_PROMPT};

#[derive(Debug, Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub(super) async fn login_page(session: Session) -> Result<Response, AppError> {
    if session::current_user(&session).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(render(
        StatusCode::OK,
        &LoginTemplate {
            username: String::new(),
            prompt: Some(LOGIN_PROMPT),
            error: None,
        },
    ))
}

pub(super) async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() {
        return Ok(render(
            StatusCode::UNPROCESSABLE_ENTITY,
            &LoginTemplate {
                username,
                prompt: Some(LOGIN_PROMPT),
                error: None,
            },
        ));
    }

    // Password hashing is CPU-bound; keep it off the async workers.
    let credentials = state.credentials.clone();
    let attempted = username.clone();
    let verified = tokio::task::spawn_blocking(move || {
        credentials
            .verify(&attempted, &form.password)
            .map(|(name, user)| {
                let preauthorized = credentials.is_preauthorized(&user.email);
                let user = SessionUser {
                    username: name.to_string(),
                    name: user.name.clone(),
                };
                (user, preauthorized)
            })
    })
    .await?;

    let Some((user, preauthorized)) = verified else {
        tracing::warn!(username = %username, "failed login attempt");
        return Ok(render(
            StatusCode::UNAUTHORIZED,
            &LoginTemplate {
                username,
                prompt: None,
                error: Some(LOGIN_FAILED),
            },
        ));
    };

    session::log_in(&session, &user).await?;
    tracing::info!(username = %user.username, preauthorized, "user logged in");
    Ok(Redirect::to("/").into_response())
}

pub(super) async fn logout(session: Session) -> Result<Redirect, AppError> {
    if let Some(user) = session::current_user(&session).await? {
        tracing::info!(username = %user.username, "user logged out");
    }
    session::log_out(&session).await?;
    Ok(Redirect::to("/login"))
}
