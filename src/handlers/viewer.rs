//! Who is looking at the page, resolved from request cookies.

use super::flash::Flash;
use crate::app_state::AppState;
use crate::domain::SessionInfo;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;

pub(crate) const SESSION_COOKIE: &str = "session";
pub(crate) const FLASH_COOKIE: &str = "flash";

/// A `Path=/; HttpOnly; SameSite=Lax` cookie.
pub(crate) fn site_cookie(name: &'static str, value: String) -> Cookie<'static> {
    // ---
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Removal has to name the same path the cookie was set with.
fn removal(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    // ---
    jar.get(name)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// The caller's identity (if any) and the pending flash (if any).
///
/// A session lookup failure is logged and the request continues anonymously;
/// pages that need a user then send the caller to the login form.
pub(crate) struct Viewer {
    // ---
    jar: CookieJar,
    user: Option<SessionInfo>,
    token: Option<String>,
    flash: Option<Flash>,
}

impl Viewer {
    // ---
    pub(crate) fn user(&self) -> Option<&SessionInfo> {
        self.user.as_ref()
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// The request's cookies, as a starting point for response changes.
    pub(crate) fn cookies(&self) -> CookieJar {
        self.jar.clone()
    }

    /// The jar for a page that shows the pending flash: the flash cookie is
    /// expired in the same response.
    pub(crate) fn consume_flash(&self) -> CookieJar {
        // ---
        match self.flash {
            Some(_) => self.cookies().remove(removal(FLASH_COOKIE)),
            None => self.cookies(),
        }
    }

    /// `303 See Other` to `to`, leaving a flash for the next page.
    pub(crate) fn redirect_with_flash(&self, to: &str, flash: Flash) -> Response {
        // ---
        let jar = self.cookies().add(site_cookie(FLASH_COOKIE, flash.encode()));
        (jar, Redirect::to(to)).into_response()
    }

    /// Start a session: session cookie plus a success flash, then home.
    pub(crate) fn log_in(&self, token: String, flash: Flash) -> Response {
        // ---
        let jar = self
            .cookies()
            .add(site_cookie(SESSION_COOKIE, token))
            .add(site_cookie(FLASH_COOKIE, flash.encode()));
        (jar, Redirect::to("/")).into_response()
    }

    /// End the session cookie, flash, then home.
    pub(crate) fn log_out(&self, flash: Flash) -> Response {
        // ---
        let jar = self
            .cookies()
            .remove(removal(SESSION_COOKIE))
            .add(site_cookie(FLASH_COOKIE, flash.encode()));
        (jar, Redirect::to("/")).into_response()
    }

    /// The logged-in user, or a redirect to the login form.
    pub(crate) fn require(&self) -> Result<&SessionInfo, Response> {
        // ---
        self.user.as_ref().ok_or_else(|| {
            tracing::debug!("Anonymous request to a page that needs a login");
            self.redirect_with_flash("/login", Flash::danger("Please log in to access this page."))
        })
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // ---
        let jar = CookieJar::from_headers(&parts.headers);
        let token = non_empty(&jar, SESSION_COOKIE);
        let flash = non_empty(&jar, FLASH_COOKIE).and_then(|value| Flash::decode(&value));

        let user = match &token {
            Some(token) => match state.sessions().get_session(token).await {
                Ok(user) => user,
                Err(err) => {
                    tracing::error!("Session lookup failed: {err:#}");
                    None
                }
            },
            None => None,
        };

        Ok(Viewer {
            jar,
            user,
            token,
            flash,
        })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

    fn viewer(cookies: &str) -> Viewer {
        // ---
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookies).unwrap());
        let jar = CookieJar::from_headers(&headers);

        Viewer {
            token: non_empty(&jar, SESSION_COOKIE),
            flash: non_empty(&jar, FLASH_COOKIE).and_then(|value| Flash::decode(&value)),
            user: None,
            jar,
        }
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        // ---
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn site_cookie_is_http_only_and_lax() {
        // ---
        let cookie = site_cookie(SESSION_COOKIE, "abc".to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.value(), "abc");
    }

    #[test]
    fn empty_session_cookie_counts_as_absent() {
        // ---
        let viewer = viewer("theme=dark; session=");
        assert!(viewer.token().is_none());
    }

    #[test]
    fn log_out_expires_session_and_sets_flash() {
        // ---
        let response = viewer("session=abc").log_out(Flash::success("bye"));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let cookies = set_cookies(&response);
        assert!(cookies
            .iter()
            .any(|c| c.starts_with("session=;") && c.contains("Max-Age=0")));
        assert!(cookies
            .iter()
            .any(|c| c.starts_with("flash=") && c.contains("HttpOnly")));
    }

    #[test]
    fn flash_is_consumed_only_when_present() {
        // ---
        let encoded = Flash::success("hi").encode();

        let with_flash = viewer(&format!("flash={encoded}"));
        assert_eq!(with_flash.flash().map(|f| f.message.as_str()), Some("hi"));
        let removed = with_flash.consume_flash().get(FLASH_COOKIE).is_none();
        assert!(removed);

        let without = viewer("session=abc");
        assert!(without.flash().is_none());
        assert!(without.consume_flash().get(SESSION_COOKIE).is_some());
    }
}
