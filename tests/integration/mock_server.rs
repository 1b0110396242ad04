//! Mock HTTP server setup for integration tests

use fetchy::{Fetchy, FetchyBuilder};
use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        crate::init_tracing();
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client whose relative URLs resolve against the mock server
    pub fn client(&self) -> Fetchy {
        self.builder().build().expect("client should build")
    }

    pub fn builder(&self) -> FetchyBuilder {
        FetchyBuilder::new().base_url(format!("{}/", self.base_url))
    }

    /// Absolute URL for `path` on the mock server
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a mock answering with a JSON body
    pub async fn mock_json(&self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock answering with a plain text body
    pub async fn mock_text(&self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create_async()
            .await
    }
}
