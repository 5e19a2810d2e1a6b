// Test helpers are intentionally partially used
#![allow(dead_code)]

use reqwest::{header, redirect, Client, Response, StatusCode};
use std::time::Duration;
use tokio::net::TcpListener;
use tutorial_hub::{
    create_router_with_config, AppConfig, MetricsBackend, ServerConfig, SessionBackend,
    SessionConfig, StoreBackend,
};

// ============================================================================
// Test Setup
// ============================================================================

/// Configuration with every backend in memory, so tests need no services.
pub fn memory_config() -> AppConfig {
    // ---
    AppConfig {
        store: StoreBackend::Memory,
        sessions: SessionConfig {
            backend: SessionBackend::Memory,
            ttl: Duration::from_secs(3600),
        },
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            metrics: MetricsBackend::Noop,
        },
    }
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        // --
        Self::with_config(&memory_config()).await
    }

    pub async fn with_config(config: &AppConfig) -> Self {
        // ---
        let app = create_router_with_config(config)
            .await
            .expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects are asserted on, never followed.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str, cookies: &str) -> Response {
        // ---
        self.client
            .get(self.url(path))
            .header(header::COOKIE, cookies)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post(&self, path: &str, cookies: &str, form: &[(&str, &str)]) -> Response {
        // ---
        self.client
            .post(self.url(path))
            .header(header::COOKIE, cookies)
            .form(form)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Follow a redirect by hand, carrying the flash it set plus `cookies`.
    /// Returns the status and body of the target page.
    pub async fn follow(&self, response: Response, cookies: &str) -> (StatusCode, String) {
        // ---
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response);

        let mut jar = cookies.to_string();
        if let Some(flash) = cookie_value(&response, "flash") {
            jar = format!("{jar}; flash={flash}");
        }

        let page = self.get(&target, &jar).await;
        let status = page.status();
        (status, page.text().await.unwrap())
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response {
        // ---
        self.post(
            "/register",
            "",
            &[("username", username), ("email", email), ("password", password)],
        )
        .await
    }

    /// Register and log in; returns the `session=...` cookie pair.
    pub async fn signed_up(&self, username: &str, email: &str, password: &str) -> String {
        // ---
        let registered = self.register(username, email, password).await;
        assert_eq!(registered.status(), StatusCode::SEE_OTHER);

        let login = self
            .post("/login", "", &[("email", email), ("password", password)])
            .await;
        assert_eq!(login.status(), StatusCode::SEE_OTHER);

        let token = cookie_value(&login, "session").expect("login sets the session cookie");
        format!("session={token}")
    }

    /// Create a tutorial as the given session; returns its id.
    pub async fn new_tutorial(&self, session: &str, title: &str, content: &str) -> i64 {
        // ---
        let created = self
            .post(
                "/new_tutorial",
                session,
                &[("title", title), ("content", content)],
            )
            .await;
        assert_eq!(created.status(), StatusCode::SEE_OTHER);

        location(&created)
            .strip_prefix("/tutorial/")
            .and_then(|id| id.parse().ok())
            .expect("redirect points at the new tutorial")
    }
}

pub fn location(response: &Response) -> String {
    // ---
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect has a Location header")
        .to_string()
}

/// Value of a cookie set by `response`, ignoring cleared (empty) cookies.
pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    // ---
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Whether `response` expires the named cookie.
pub fn clears_cookie(response: &Response, name: &str) -> bool {
    // ---
    let prefix = format!("{name}=;");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix) && v.contains("Max-Age=0"))
}

/// Likes/dislikes as shown on the tutorial page.
pub fn tally(page: &str) -> (i32, i32) {
    // ---
    let count = |label: &str| -> i32 {
        let start = page.find(label).expect("counter on page") + label.len();
        page[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap()
    };
    (count("Likes: "), count("Dislikes: "))
}
