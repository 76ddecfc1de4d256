//! # Common Test Utilities
//!
//! Test harnesses shared by the `tenderlens-server` integration tests:
//!
//! - `TestApp::spawn`: a real server built from a generated `config.yml`, with
//!   the LLM and embedding endpoints served by an `httpmock::MockServer`.
//! - `TestApp::spawn_with_mocks`: a server whose analyzer and store are wired
//!   to in-process fakes from `tenderlens-test-utils`.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::{prelude::*, Mock};
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde_json::{json, Value};
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use tempfile::{tempdir, TempDir};
use tenderlens::{providers::db::sqlite::SqliteVectorStore, TenderAnalyzer};
use tenderlens_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use tenderlens_test_utils::{MockAiProvider, MockEmbeddingProvider};
use tokio::{net::TcpListener, task::JoinHandle};

pub const CHAT_PATH: &str = "/v1/chat/completions";
pub const EMBEDDINGS_PATH: &str = "/v1/embeddings";

/// A complete analysis covering every heading of the prompt.
pub const SAMPLE_ANALYSIS: &str = "\
# TENDER SUMMARY
Construction of a new bridge over the river Avon.
# BASIC INFORMATION
- Tender Reference Number: BR-2024-003
- Issuing Organization: County Highways Department
- Submission Deadline: 2024-11-15
- Estimated Budget: 4,500,000 GBP
# KEY REQUIREMENTS
- Chartered structural engineer on staff
- Experience with river crossings
# ELIGIBILITY CRITERIA
- Turnover above 10M GBP
# EVALUATION CRITERIA
- Price 50%
- Quality 50%
# REQUIRED DOCUMENTS
- Insurance certificates
# COMPLIANCE CHECKLIST
- Health and safety plan attached
# WINNING STRATEGY
Emphasise previous river crossing projects.
# RISKS AND MITIGATIONS
- Flooding: schedule works in summer";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
///
/// The server runs on a random port. Temporary directories for the vector
/// index and uploads live as long as the harness.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    pub upload_dir: TempDir,
    _data_dir: TempDir,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server from a generated config file, pointing both remote
    /// providers at the mock server.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start_async().await;
        let data_dir = tempdir()?;
        let upload_dir = tempdir()?;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
host: "127.0.0.1"
port: 0
xai_api_key: "test-xai-key"
openai_api_key: "test-openai-key"
persist_directory: "{}"
upload_dir: "{}"
llm:
  api_url: "{}"
  model: "mock-chat-model"
  timeout_secs: 5
embedding:
  api_url: "{}"
  model_name: "mock-embedding-model"
  timeout_secs: 5
"#,
            data_dir.path().join("vector_db").display(),
            upload_dir.path().display(),
            mock_server.url(CHAT_PATH),
            mock_server.url(EMBEDDINGS_PATH),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-utf8 temp path"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config).await?;

        let mut app = Self::spawn_with_state(app_state, mock_server, data_dir, upload_dir).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    /// Spawns the server with an in-memory store and in-process fake providers.
    pub async fn spawn_with_mocks(
        ai_provider: MockAiProvider,
        embedder: MockEmbeddingProvider,
    ) -> Result<Self> {
        Self::spawn_with_mocks_and_config(ai_provider, embedder, |_| {}).await
    }

    /// Like [`TestApp::spawn_with_mocks`], letting `configure` adjust the
    /// config (timeouts, body limit) before the server starts.
    pub async fn spawn_with_mocks_and_config(
        ai_provider: MockAiProvider,
        embedder: MockEmbeddingProvider,
        configure: impl FnOnce(&mut AppConfig),
    ) -> Result<Self> {
        let data_dir = tempdir()?;
        let upload_dir = tempdir()?;
        let mut config = AppConfig {
            upload_dir: Some(upload_dir.path().to_path_buf()),
            persist_directory: data_dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        configure(&mut config);
        let store = SqliteVectorStore::new(":memory:", Arc::new(embedder)).await?;
        let app_state = AppState::new(
            config,
            TenderAnalyzer::new(Box::new(ai_provider)),
            Arc::new(store),
        );

        let mock_server = MockServer::start_async().await;
        Self::spawn_with_state(app_state, mock_server, data_dir, upload_dir).await
    }

    async fn spawn_with_state(
        app_state: AppState,
        mock_server: MockServer,
        data_dir: TempDir,
        upload_dir: TempDir,
    ) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            upload_dir,
            _data_dir: data_dir,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Uploads `bytes` as the `file` field under `filename`.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<Response> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);
        Ok(self
            .client
            .post(format!("{}/upload-tender", self.address))
            .multipart(form)
            .send()
            .await?)
    }

    pub async fn search(&self, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}/search-tenders", self.address))
            .json(&body)
            .send()
            .await?)
    }

    /// Number of entries currently in the upload directory.
    pub fn upload_dir_entries(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Serves `analysis` as the chat-completion response.
    pub async fn mock_chat_response(&self, analysis: &str) -> Mock<'_> {
        let body = json!({
            "id": "chatcmpl-test",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": analysis } }]
        });
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST).path(CHAT_PATH);
                then.status(200).json_body(body);
            })
            .await
    }

    /// Serves a fixed embedding for every embeddings request.
    pub async fn mock_embedding_response(&self) -> Mock<'_> {
        self.mock_server
            .mock_async(|when, then| {
                when.method(POST).path(EMBEDDINGS_PATH);
                then.status(200).json_body(json!({
                    "data": [{ "embedding": [0.1, 0.2, 0.3, 0.4] }]
                }));
            })
            .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
