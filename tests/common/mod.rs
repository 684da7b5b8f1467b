//! Shared utilities for integration testing.

use std::net::SocketAddr;

use link_cloak::config::AppConfig;
use link_cloak::gate::Environment;
use link_cloak::http::page::Page;
use link_cloak::{HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const TOKEN: &str = "X9k7f2qR8vUe4ZsB1tL0";
pub const BLOCK_URL: &str = "https://www.google.com/";
pub const PAGE: &str = "<h1>Limited offer</h1>";

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn config(token: Option<&str>, block_url: Option<&str>) -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.gate.token = token.map(String::from);
    config.gate.block_url = block_url.map(String::from);
    config
}

/// Start the full server stack in the background.
pub async fn start_server(config: AppConfig, environment: Environment) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_page(config, environment, Page::from_html(PAGE));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
