//! Server-rendered HTML.
//!
//! Page structs are askama templates under `templates/`; every `{{ }}`
//! interpolation is HTML-escaped by the engine. Nothing here touches the
//! store.

use super::flash::Flash;
use super::viewer::Viewer;
use crate::domain::{Reaction, SessionInfo, Tutorial, TutorialDetail, User};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// What `base.html` needs: title, nav state and notices.
pub(crate) struct Layout<'a> {
    // ---
    title: &'a str,
    user: Option<&'a SessionInfo>,
    notices: Vec<Flash>,
}

impl<'a> Layout<'a> {
    // ---
    /// Carries the viewer's pending flash, if any.
    pub(crate) fn new(title: &'a str, viewer: &'a Viewer) -> Self {
        // ---
        Self {
            title,
            user: viewer.user(),
            notices: viewer.flash().cloned().into_iter().collect(),
        }
    }

    /// Show a notice on this page directly instead of via the flash cookie.
    pub(crate) fn with_notice(mut self, notice: Flash) -> Self {
        self.notices.push(notice);
        self
    }
}

/// Render `page` with `status`. A flash taken from the cookie has been shown,
/// so its cookie is cleared in the same response.
pub(crate) fn render(viewer: &Viewer, status: StatusCode, page: &impl Template) -> Response {
    // ---
    match page.render() {
        Ok(html) => (status, viewer.consume_flash(), Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Template rendering failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub(crate) struct HomePage<'a> {
    pub layout: Layout<'a>,
    pub tutorials: &'a [Tutorial],
}

pub(crate) struct ReactionButton {
    action: Reaction,
    chosen: bool,
}

#[derive(Template)]
#[template(path = "tutorial.html")]
pub(crate) struct TutorialPage<'a> {
    layout: Layout<'a>,
    detail: &'a TutorialDetail,
    buttons: Vec<ReactionButton>,
    can_edit: bool,
    logged_in: bool,
    comment_draft: &'a str,
    error: Option<&'a str>,
}

impl<'a> TutorialPage<'a> {
    // ---
    /// Reaction buttons and the comment form are for logged-in viewers; the
    /// edit link only for the author.
    pub(crate) fn new(
        layout: Layout<'a>,
        detail: &'a TutorialDetail,
        my_reaction: Option<Reaction>,
        comment_draft: &'a str,
        comment_error: Option<&'a str>,
    ) -> Self {
        // ---
        let user = layout.user;
        let buttons = match user {
            Some(_) => [Reaction::Like, Reaction::Dislike]
                .into_iter()
                .map(|action| ReactionButton {
                    action,
                    chosen: my_reaction == Some(action),
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            can_edit: user.is_some_and(|u| u.user_id == detail.tutorial.author_id),
            logged_in: user.is_some(),
            layout,
            detail,
            buttons,
            comment_draft,
            error: comment_error,
        }
    }
}

/// Create/edit form; `action` is the URL the form posts to and the layout
/// title doubles as the heading.
#[derive(Template)]
#[template(path = "tutorial_form.html")]
pub(crate) struct TutorialFormPage<'a> {
    pub layout: Layout<'a>,
    pub action: String,
    pub title: &'a str,
    pub content: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub(crate) struct RegisterPage<'a> {
    pub layout: Layout<'a>,
    pub username: &'a str,
    pub email: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub(crate) struct LoginPage<'a> {
    pub layout: Layout<'a>,
    pub email: &'a str,
}

#[derive(Template)]
#[template(path = "account.html")]
pub(crate) struct AccountPage<'a> {
    pub layout: Layout<'a>,
    pub user: &'a User,
    pub avatar_draft: &'a str,
    pub error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "message.html")]
pub(crate) struct MessagePage<'a> {
    pub layout: Layout<'a>,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::Utc;

    fn tutorial(title: &str) -> Tutorial {
        // ---
        Tutorial {
            id: 1,
            title: title.to_string(),
            content: "body".to_string(),
            created_at: Utc::now(),
            author_id: 10,
            author: "alice".to_string(),
            likes: 2,
            dislikes: 1,
        }
    }

    fn layout<'a>(user: Option<&'a SessionInfo>) -> Layout<'a> {
        // ---
        Layout {
            title: "Test",
            user,
            notices: Vec::new(),
        }
    }

    #[test]
    fn home_lists_escaped_titles() {
        // ---
        let tutorials = [tutorial("Rust <3 & \"friends\"")];
        let html = HomePage {
            layout: layout(None),
            tutorials: &tutorials,
        }
        .render()
        .unwrap();

        assert!(html.contains("Welcome to Web Development Tutorials"));
        assert!(html.contains(r#"<a href="/tutorial/1">Rust "#));
        assert!(!html.contains("Rust <3"));
        assert!(!html.contains("\"friends\""));
        assert!(html.contains("2 likes, 1 dislikes"));
    }

    #[test]
    fn notices_and_nav_follow_the_viewer() {
        // ---
        let alice = SessionInfo {
            user_id: 10,
            username: "<alice>".to_string(),
        };
        let page = MessagePage {
            layout: layout(Some(&alice)).with_notice(Flash::danger("Nope <script>")),
            message: "m",
        };
        let html = page.render().unwrap();

        assert!(html.contains(r#"class="flash flash-danger""#));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<alice>"));
        assert!(html.contains(r#"action="/logout""#));
        assert!(!html.contains(r#"href="/register""#));
    }

    #[test]
    fn author_sees_edit_link_and_others_do_not() {
        // ---
        let detail = TutorialDetail {
            tutorial: tutorial("T1"),
            comments: vec![],
        };
        let author = SessionInfo {
            user_id: 10,
            username: "alice".to_string(),
        };
        let other = SessionInfo {
            user_id: 11,
            username: "bob".to_string(),
        };

        let page = |user| {
            TutorialPage::new(layout(user), &detail, Some(Reaction::Like), "", None)
                .render()
                .unwrap()
        };

        let as_author = page(Some(&author));
        assert!(as_author.contains("/edit_tutorial/1"));
        assert!(as_author.contains(r#"class="chosen""#));
        assert!(!page(Some(&other)).contains("/edit_tutorial/1"));

        let anonymous = page(None);
        assert!(!anonymous.contains("/like_dislike/1"));
        assert!(anonymous.contains("Log in</a> to comment"));
    }

    #[test]
    fn rejected_comment_shows_error_and_draft() {
        // ---
        let detail = TutorialDetail {
            tutorial: tutorial("T1"),
            comments: vec![],
        };
        let bob = SessionInfo {
            user_id: 11,
            username: "bob".to_string(),
        };

        let html = TutorialPage::new(layout(Some(&bob)), &detail, None, "draft", Some("Too long"))
            .render()
            .unwrap();
        assert!(html.contains(r#"<div class="form-error">Too long</div>"#));
        assert!(html.contains(">draft</textarea>"));
        assert!(!html.contains(r#"class="chosen""#));
    }
}
