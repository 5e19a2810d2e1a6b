use super::errors::error_page;
use super::flash::Flash;
use super::viewer::Viewer;
use crate::app_state::AppState;
use crate::domain::TutorialId;
use crate::workflows;
use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ReactionForm {
    #[serde(default)]
    action: String,
}

/// Handler for `POST /like_dislike/{id}`.
///
/// Always answers with a redirect back to the tutorial page; an unknown
/// `action` value comes back as a danger flash.
#[tracing::instrument(skip(state, viewer))]
pub(crate) async fn like_dislike(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<TutorialId>,
    Form(form): Form<ReactionForm>,
) -> Response {
    // ---
    let user = match viewer.require() {
        Ok(user) => user,
        Err(redirect) => return redirect,
    };
    let back = format!("/tutorial/{id}");

    let action = match workflows::parse_action(&form.action) {
        Ok(action) => action,
        Err(err) => return viewer.redirect_with_flash(&back, Flash::danger(err.to_string())),
    };

    match workflows::react(state.repository(), id, user.user_id, action).await {
        Ok(_) => {
            state.metrics().record_reaction(action);
            viewer.redirect_with_flash(&back, Flash::success("Your reaction has been recorded!"))
        }
        Err(err) => error_page(&viewer, err),
    }
}
