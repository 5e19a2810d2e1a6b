use super::flash::Flash;
use super::viewer::Viewer;
use super::views::{render, Layout, MessagePage};
use crate::workflows::WorkflowError;
use axum::{http::StatusCode, response::Response};

fn message_page(viewer: &Viewer, status: StatusCode, heading: &str, message: &str) -> Response {
    // ---
    let page = MessagePage {
        layout: Layout::new(heading, viewer),
        message,
    };
    render(viewer, status, &page)
}

/// Turn a workflow failure into the page the browser should see.
///
/// Form handlers deal with `ValidationFailed` and `Conflict` themselves by
/// re-rendering the form; they only reach this function for everything else.
pub(crate) fn error_page(viewer: &Viewer, err: WorkflowError) -> Response {
    // ---
    match err {
        WorkflowError::NotFound { entity, id } => {
            tracing::debug!(entity, id, "Not found");
            not_found_page(viewer)
        }
        WorkflowError::Forbidden(message) => {
            tracing::warn!("Forbidden: {message}");
            viewer.redirect_with_flash("/", Flash::danger(message))
        }
        WorkflowError::AuthenticationFailed => {
            viewer.redirect_with_flash("/login", Flash::danger(err.to_string()))
        }
        WorkflowError::ValidationFailed(ref message) => message_page(
            viewer,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid request",
            message,
        ),
        WorkflowError::Conflict { .. } => {
            message_page(viewer, StatusCode::CONFLICT, "Conflict", &err.to_string())
        }
        WorkflowError::Store(err) => {
            tracing::error!("Store failure: {err:#}");
            message_page(
                viewer,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "Please try again later.",
            )
        }
    }
}

pub(crate) fn not_found_page(viewer: &Viewer) -> Response {
    // ---
    message_page(
        viewer,
        StatusCode::NOT_FOUND,
        "Not found",
        "The page you are looking for does not exist.",
    )
}

/// Router fallback for unknown paths.
pub(crate) async fn fallback_handler(viewer: Viewer) -> Response {
    not_found_page(&viewer)
}
