use super::errors::error_page;
use super::flash::Flash;
use super::viewer::Viewer;
use super::views::{render, AccountPage, Layout};
use crate::app_state::AppState;
use crate::domain::User;
use crate::workflows::{self, WorkflowError};
use axum::{extract::State, http::StatusCode, response::Response, Form};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AvatarForm {
    #[serde(default)]
    avatar: String,
}

fn account_form(viewer: &Viewer, user: &User, draft: &str, error: Option<&str>) -> Response {
    // ---
    let status = match error {
        Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
        None => StatusCode::OK,
    };
    let page = AccountPage {
        layout: Layout::new("Account", viewer),
        user,
        avatar_draft: draft,
        error,
    };
    render(viewer, status, &page)
}

/// Handler for `GET /account`.
#[tracing::instrument(skip_all)]
pub(crate) async fn account_page(State(state): State<AppState>, viewer: Viewer) -> Response {
    // ---
    let caller = match viewer.require() {
        Ok(user) => user.user_id,
        Err(redirect) => return redirect,
    };

    match workflows::get_account(state.repository(), caller).await {
        Ok(user) => account_form(&viewer, &user, &user.avatar, None),
        Err(err) => error_page(&viewer, err),
    }
}

/// Handler for `POST /account`: change the avatar file name.
#[tracing::instrument(skip_all)]
pub(crate) async fn update_account(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<AvatarForm>,
) -> Response {
    // ---
    let caller = match viewer.require() {
        Ok(user) => user.user_id,
        Err(redirect) => return redirect,
    };

    match workflows::set_avatar(state.repository(), caller, &form.avatar).await {
        Ok(_) => viewer.redirect_with_flash("/account", Flash::success("Avatar updated!")),
        Err(WorkflowError::ValidationFailed(message)) => {
            match workflows::get_account(state.repository(), caller).await {
                Ok(user) => account_form(&viewer, &user, &form.avatar, Some(&message)),
                Err(err) => error_page(&viewer, err),
            }
        }
        Err(err) => error_page(&viewer, err),
    }
}
