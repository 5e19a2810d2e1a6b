//! Tutorial pages: view, comment, create, edit.

use super::errors::error_page;
use super::flash::Flash;
use super::viewer::Viewer;
use super::views::{render, Layout, TutorialFormPage, TutorialPage};
use crate::app_state::AppState;
use crate::domain::TutorialId;
use crate::workflows::{self, WorkflowError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CommentForm {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TutorialForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

fn tutorial_url(id: TutorialId) -> String {
    format!("/tutorial/{id}")
}

/// The create/edit form, optionally re-filled after a rejected submit.
fn tutorial_form(
    viewer: &Viewer,
    heading: &str,
    action: String,
    title: &str,
    content: &str,
    error: Option<&str>,
) -> Response {
    // ---
    let status = match error {
        Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
        None => StatusCode::OK,
    };
    let page = TutorialFormPage {
        layout: Layout::new(heading, viewer),
        action,
        title,
        content,
        error,
    };
    render(viewer, status, &page)
}

/// Render the tutorial page, optionally with a rejected comment draft.
async fn render_tutorial(
    state: &AppState,
    viewer: &Viewer,
    id: TutorialId,
    draft: &str,
    comment_error: Option<&str>,
) -> Response {
    // ---
    let detail = match workflows::get_tutorial(state.repository(), id).await {
        Ok(detail) => detail,
        Err(err) => return error_page(viewer, err),
    };

    let my_reaction = match viewer.user() {
        Some(user) => match workflows::current_reaction(state.repository(), id, user.user_id).await {
            Ok(reaction) => reaction,
            Err(err) => return error_page(viewer, err),
        },
        None => None,
    };

    let status = match comment_error {
        Some(_) => StatusCode::UNPROCESSABLE_ENTITY,
        None => StatusCode::OK,
    };
    let layout = Layout::new(&detail.tutorial.title, viewer);
    let page = TutorialPage::new(layout, &detail, my_reaction, draft, comment_error);
    render(viewer, status, &page)
}

/// Handler for `GET /tutorial/{id}`.
#[tracing::instrument(skip(state, viewer))]
pub(crate) async fn view_tutorial(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<TutorialId>,
) -> Response {
    // ---
    render_tutorial(&state, &viewer, id, "", None).await
}

/// Handler for `POST /tutorial/{id}`: add a comment as the logged-in user.
#[tracing::instrument(skip(state, viewer, form))]
pub(crate) async fn post_comment(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<TutorialId>,
    Form(form): Form<CommentForm>,
) -> Response {
    // ---
    let user = match viewer.require() {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    match workflows::add_comment(state.repository(), id, user.user_id, &form.content).await {
        Ok(_) => {
            state.metrics().record_comment_created();
            viewer.redirect_with_flash(&tutorial_url(id), Flash::success("Your comment has been added!"))
        }
        Err(WorkflowError::ValidationFailed(message)) => {
            render_tutorial(&state, &viewer, id, &form.content, Some(&message)).await
        }
        Err(err) => error_page(&viewer, err),
    }
}

pub(crate) async fn new_tutorial_page(viewer: Viewer) -> Response {
    // ---
    if let Err(redirect) = viewer.require() {
        return redirect;
    }
    tutorial_form(&viewer, "New tutorial", "/new_tutorial".to_string(), "", "", None)
}

/// Handler for `POST /new_tutorial`.
#[tracing::instrument(skip_all)]
pub(crate) async fn create_tutorial(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<TutorialForm>,
) -> Response {
    // ---
    let user = match viewer.require() {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    match workflows::create_tutorial(state.repository(), user.user_id, &form.title, &form.content).await {
        Ok(tutorial) => {
            state.metrics().record_tutorial_created();
            viewer.redirect_with_flash(&tutorial_url(tutorial.id), Flash::success("Tutorial created!"))
        }
        Err(WorkflowError::ValidationFailed(message)) => tutorial_form(
            &viewer,
            "New tutorial",
            "/new_tutorial".to_string(),
            &form.title,
            &form.content,
            Some(&message),
        ),
        Err(err) => error_page(&viewer, err),
    }
}

/// Handler for `GET /edit_tutorial/{id}`. Only the author gets the form.
#[tracing::instrument(skip(state, viewer))]
pub(crate) async fn edit_tutorial_page(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<TutorialId>,
) -> Response {
    // ---
    let user = match viewer.require() {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    match workflows::tutorial_for_edit(state.repository(), id, user.user_id).await {
        Ok(tutorial) => tutorial_form(
            &viewer,
            "Edit tutorial",
            format!("/edit_tutorial/{id}"),
            &tutorial.title,
            &tutorial.content,
            None,
        ),
        Err(err) => error_page(&viewer, err),
    }
}

/// Handler for `POST /edit_tutorial/{id}`.
#[tracing::instrument(skip(state, viewer, form))]
pub(crate) async fn edit_tutorial(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<TutorialId>,
    Form(form): Form<TutorialForm>,
) -> Response {
    // ---
    let user = match viewer.require() {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };

    match workflows::edit_tutorial(state.repository(), id, user.user_id, &form.title, &form.content)
        .await
    {
        Ok(_) => viewer.redirect_with_flash(&tutorial_url(id), Flash::success("Tutorial updated!")),
        Err(WorkflowError::ValidationFailed(message)) => tutorial_form(
            &viewer,
            "Edit tutorial",
            format!("/edit_tutorial/{id}"),
            &form.title,
            &form.content,
            Some(&message),
        ),
        Err(err) => error_page(&viewer, err),
    }
}
