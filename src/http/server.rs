//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, gate)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::gate::{Environment, Gate};
use crate::http::middleware::gate_middleware;
use crate::http::page::{self, Page};
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::http::status;
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    pub page: Arc<Page>,
}

/// HTTP server for the gated site.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the configured index page cannot be read.
    pub fn new(config: AppConfig, environment: Environment) -> io::Result<Self> {
        let page = Page::load(&config.site)?;
        Ok(Self::with_page(config, environment, page))
    }

    /// Create a server with an already rendered page.
    pub fn with_page(config: AppConfig, environment: Environment, page: Page) -> Self {
        let gate = Gate::new(&config.gate, environment);
        Self::with_gate(config, gate, page)
    }

    pub(crate) fn with_gate(config: AppConfig, gate: Gate, page: Page) -> Self {
        let state = AppState {
            gate: Arc::new(gate),
            page: Arc::new(page),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(page::index))
            .route("/debug", get(status::get_status))
            .nest_service("/static", ServeDir::new(&config.site.static_dir))
            .layer(middleware::from_fn_with_state(state.clone(), gate_middleware))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.state.gate.environment(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn gate(&self) -> &Gate {
        &self.state.gate
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validation::validate_config, FailurePolicy};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    const TOKEN: &str = "X9k7f2qR8vUe4ZsB1tL0";
    const BLOCK: &str = "https://www.google.com/";

    fn server(token: Option<&str>, block_url: Option<&str>, environment: Environment) -> HttpServer {
        let mut config = AppConfig::default();
        config.gate.token = token.map(String::from);
        config.gate.block_url = block_url.map(String::from);
        HttpServer::with_page(config, environment, Page::from_html("<h1>offer</h1>"))
    }

    async fn get(router: Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_sets_cookie_and_strips_param() {
        let server = server(Some(TOKEN), Some(BLOCK), Environment::Production);
        let res = get(
            server.router(),
            &format!("/?creative={}&utm_source=FB", TOKEN),
            None,
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], "/?utm_source=FB");
        let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("creative_session=authorized"));
        assert!(set_cookie.contains("Max-Age=10800"));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_cookie_serves_page() {
        let server = server(Some(TOKEN), Some(BLOCK), Environment::Production);
        let res = get(server.router(), "/", Some("creative_session=authorized")).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_text(res).await, "<h1>offer</h1>");
    }

    #[tokio::test]
    async fn test_wrong_token_redirects_to_block() {
        let server = server(Some(TOKEN), Some(BLOCK), Environment::Production);
        let res = get(server.router(), "/?creative=wrong", None).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], BLOCK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_wrong_token_without_block_url_is_403() {
        let server = server(Some(TOKEN), None, Environment::Production);
        let res = get(server.router(), "/?creative=wrong", None).await;

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(!body_text(res).await.contains("offer"));
    }

    #[tokio::test]
    async fn test_direct_visit_is_blocked() {
        let server = server(Some(TOKEN), Some(BLOCK), Environment::Production);
        let res = get(server.router(), "/", None).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], BLOCK);
    }

    #[tokio::test]
    async fn test_development_serves_page_without_cookie() {
        let server = server(Some(TOKEN), Some(BLOCK), Environment::Development);
        let res = get(server.router(), "/?creative=wrong", None).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_debug_is_exempt() {
        let server = server(Some(TOKEN), None, Environment::Production);
        let res = get(server.router(), "/debug", None).await;

        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
        assert_eq!(json["environment"], "PRODUCTION");
        assert_eq!(json["cloakerActive"], true);
        assert_eq!(json["tokenConfigured"], true);
        assert_eq!(json["blockUrlConfigured"], false);
    }

    #[tokio::test]
    async fn test_exempt_missing_asset_is_404_not_blocked() {
        let server = server(Some(TOKEN), Some(BLOCK), Environment::Production);
        let res = get(server.router(), "/static/missing.css", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = get(server.router(), "/robots.txt", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path_is_gated() {
        let server = server(Some(TOKEN), None, Environment::Production);
        let res = get(server.router(), "/secret", None).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = get(server.router(), "/secret", Some("creative_session=authorized")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let server = server(Some(TOKEN), None, Environment::Production);
        let res = get(server.router(), "/debug", None).await;
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_failure_policy_is_exposed() {
        let mut config = AppConfig::default();
        config.gate.failure_policy = FailurePolicy::FailClosed;
        let server = HttpServer::with_page(config, Environment::Production, Page::from_html(""));
        assert_eq!(server.gate().failure_policy(), FailurePolicy::FailClosed);
        assert_eq!(server.config().gate.failure_policy, FailurePolicy::FailClosed);
    }

    fn failing_server(policy: FailurePolicy) -> HttpServer {
        let mut config = AppConfig::default();
        config.gate.token = Some(TOKEN.into());
        config.gate.failure_policy = policy;
        let gate = Gate::new(&config.gate, Environment::Production)
            .with_raw_block_url("https://example.com/a\nb");
        HttpServer::with_gate(config, gate, Page::from_html("<h1>offer</h1>"))
    }

    #[tokio::test]
    async fn test_block_url_with_newline_still_refuses() {
        let mut config = AppConfig::default();
        config.gate.token = Some(TOKEN.into());
        config.gate.block_url = Some("https://example.com/a\nb".into());
        assert!(validate_config(&config).is_ok());

        let server = HttpServer::with_page(config, Environment::Production, Page::from_html("<h1>offer</h1>"));
        for uri in ["/?creative=wrong", "/"] {
            let res = get(server.router(), uri, None).await;
            assert_eq!(res.status(), StatusCode::FOUND);
            assert_eq!(res.headers()[header::LOCATION], "https://example.com/ab");
            assert!(!body_text(res).await.contains("offer"));
        }
    }

    #[tokio::test]
    async fn test_response_failure_fail_closed_refuses() {
        let server = failing_server(FailurePolicy::FailClosed);
        for uri in ["/?creative=wrong", "/"] {
            let res = get(server.router(), uri, None).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN);
            assert!(!body_text(res).await.contains("offer"));
        }

        let res = get(server.router(), "/", Some("creative_session=authorized")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_response_failure_fail_open_serves_page() {
        let server = failing_server(FailurePolicy::FailOpen);
        let res = get(server.router(), "/?creative=wrong", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(body_text(res).await, "<h1>offer</h1>");
    }
}
