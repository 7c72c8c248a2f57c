//! Canvas server fixture
//!
//! Serves the real router on `127.0.0.1:0` so client code can talk to it
//! over HTTP. The server and its cleanup task stop when the fixture drops.

use std::time::Duration;

use canvas_sync::backend::{create_app, ServerConfig};
use canvas_sync::client::ClientConfig;
use tokio::task::JoinHandle;

pub struct TestCanvasServer {
    pub base_url: String,
    server: JoinHandle<()>,
    cleanup: JoinHandle<()>,
}

impl Drop for TestCanvasServer {
    fn drop(&mut self) {
        self.server.abort();
        self.cleanup.abort();
    }
}

pub fn server_config(canvas_size: usize, cooldown_seconds: u64) -> ServerConfig {
    ServerConfig::builder()
        .canvas_size(canvas_size)
        .cooldown_seconds(cooldown_seconds)
        .build()
        .expect("valid server config")
}

pub async fn spawn_test_server(config: ServerConfig) -> TestCanvasServer {
    let (app, cleanup) = create_app(config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve canvas app");
    });

    TestCanvasServer {
        base_url: format!("http://{}", addr),
        server,
        cleanup,
    }
}

/// Client config that never polls on its own within a test
pub fn client_config(base_url: &str) -> ClientConfig {
    ClientConfig::builder()
        .server_url(base_url)
        .poll_interval(Duration::from_secs(3600))
        .request_timeout(Duration::from_secs(5))
        .build()
        .expect("valid client config")
}
