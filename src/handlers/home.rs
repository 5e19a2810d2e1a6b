use super::errors::error_page;
use super::viewer::Viewer;
use super::views::{render, HomePage, Layout};
use crate::app_state::AppState;
use crate::workflows;
use axum::{extract::State, http::StatusCode, response::Response};

/// Handler for `GET /`: every tutorial, newest first.
#[tracing::instrument(skip_all)]
pub(crate) async fn home(State(state): State<AppState>, viewer: Viewer) -> Response {
    // ---
    match workflows::list_tutorials(state.repository()).await {
        Ok(tutorials) => {
            let page = HomePage {
                layout: Layout::new("Home", &viewer),
                tutorials: &tutorials,
            };
            render(&viewer, StatusCode::OK, &page)
        }
        Err(err) => error_page(&viewer, err),
    }
}
