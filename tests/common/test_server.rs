use std::path::Path;
use std::sync::Arc;

use roster::server::{AppState, create_router};
use roster::store::{SqliteStore, Store};
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub client: reqwest::Client,
    server_task: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_, _| {}).await
    }

    /// Starts a server after letting the caller adjust its state.
    pub async fn start_with(configure: impl FnOnce(&mut AppState, &Path)) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");

        let store = SqliteStore::new(temp_dir.path().join("roster.db")).expect("open store");
        store.initialize().expect("initialize schema");

        let mut state = AppState::new(Arc::new(store));
        configure(&mut state, temp_dir.path());
        let app = create_router(Arc::new(state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let server = Self {
            temp_dir,
            base_url,
            client: reqwest::Client::new(),
            server_task: Some(server_task),
        };
        server.wait_for_ready().await;
        server
    }

    async fn wait_for_ready(&self) {
        for _ in 0..50 {
            if self
                .client
                .get(format!("{}/health", self.base_url))
                .send()
                .await
                .is_ok()
            {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("Server did not become ready");
    }

    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Creates a team and returns its JSON record.
    pub async fn create_team(&self, name: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/teams"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("create team");
        assert_eq!(resp.status(), 201);
        resp.json().await.expect("parse team")
    }

    /// Creates a player and returns its JSON record.
    pub async fn create_player(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/players"))
            .json(&body)
            .send()
            .await
            .expect("create player");
        assert_eq!(resp.status(), 201);
        resp.json().await.expect("parse player")
    }

    /// GET helper returning status and body.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("send GET");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("parse body"))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
    }
}
