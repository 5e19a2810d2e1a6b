//! Register, log in, log out.

use super::errors::error_page;
use super::flash::Flash;
use super::viewer::Viewer;
use super::views::{render, Layout, LoginPage, RegisterPage};
use crate::app_state::AppState;
use crate::workflows::{self, WorkflowError};
use axum::{extract::State, http::StatusCode, response::Response, Form};
use serde::Deserialize;

// Form fields default to empty so a missing field is a validation error
// rather than an extractor rejection. No Debug: these carry passwords.

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub(crate) async fn register_page(viewer: Viewer) -> Response {
    // ---
    let page = RegisterPage {
        layout: Layout::new("Register", &viewer),
        username: "",
        email: "",
        error: None,
    };
    render(&viewer, StatusCode::OK, &page)
}

/// Handler for `POST /register`.
///
/// - Success: `303` to `/login` with a success flash.
/// - Invalid input: `422` with the form re-rendered.
/// - Duplicate username or email: `409` with the form re-rendered.
#[tracing::instrument(skip_all)]
pub(crate) async fn register_submit(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<RegisterForm>,
) -> Response {
    // ---
    match workflows::register(state.repository(), &form.username, &form.email, &form.password).await {
        Ok(_) => {
            state.metrics().record_user_registered();
            viewer.redirect_with_flash("/login", Flash::success("Your account has been created!"))
        }
        Err(err @ (WorkflowError::ValidationFailed(_) | WorkflowError::Conflict { .. })) => {
            let status = match err {
                WorkflowError::Conflict { .. } => StatusCode::CONFLICT,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let message = err.to_string();
            let page = RegisterPage {
                layout: Layout::new("Register", &viewer),
                username: &form.username,
                email: &form.email,
                error: Some(&message),
            };
            render(&viewer, status, &page)
        }
        Err(err) => error_page(&viewer, err),
    }
}

pub(crate) async fn login_page(viewer: Viewer) -> Response {
    // ---
    let page = LoginPage {
        layout: Layout::new("Log in", &viewer),
        email: "",
    };
    render(&viewer, StatusCode::OK, &page)
}

/// Handler for `POST /login`.
///
/// On success the session cookie is set and the browser goes to `/`.
/// Bad credentials re-render the form with `401` and a danger notice.
#[tracing::instrument(skip_all)]
pub(crate) async fn login_submit(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<LoginForm>,
) -> Response {
    // ---
    match workflows::login(state.repository(), state.sessions(), &form.email, &form.password).await {
        Ok(logged_in) => {
            state.metrics().record_login(true);
            viewer.log_in(logged_in.token, Flash::success("Login successful!"))
        }
        Err(err @ (WorkflowError::AuthenticationFailed | WorkflowError::ValidationFailed(_))) => {
            state.metrics().record_login(false);
            let status = match err {
                WorkflowError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let page = LoginPage {
                layout: Layout::new("Log in", &viewer).with_notice(Flash::danger(err.to_string())),
                email: &form.email,
            };
            render(&viewer, status, &page)
        }
        Err(err) => error_page(&viewer, err),
    }
}

/// Handler for `POST /logout`. Always ends on `/` with the cookie cleared.
#[tracing::instrument(skip_all)]
pub(crate) async fn logout(State(state): State<AppState>, viewer: Viewer) -> Response {
    // ---
    if let Some(token) = viewer.token() {
        if let Err(err) = workflows::logout(state.sessions(), token).await {
            tracing::error!("Failed to destroy session: {err:#}");
        }
    }

    viewer.log_out(Flash::success("You have been logged out."))
}
