#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::{Arc, Once};

use docscan::api::{create_router, AppState};
use docscan::config::{Config, DatabaseConfig, OcrConfig, ServerConfig, StorageConfig};
use docscan::db::{Database, DatabaseBackend, LibSqlBackend};
use docscan::ocr::{OcrEngine, OcrProvider};
use docscan::storage::{BlobStore, StorageProvider};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A small solid-colour PNG.
pub fn sample_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(16, 16, Rgb([255u8, 255, 255])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode sample PNG");
    out.into_inner()
}

/// A running server wired to mock blob storage and a mock vision API.
pub struct TestApp {
    pub addr: SocketAddr,
    pub blob_server: MockServer,
    pub ocr_server: MockServer,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn blob_base(&self) -> String {
        format!("{}/acct/documents/", self.blob_server.uri())
    }
}

pub async fn spawn_app(ocr_text: &str) -> TestApp {
    init_test_logger();

    let blob_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/acct/documents/[0-9a-f-]{36}"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&blob_server)
        .await;

    let ocr_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o-mini",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": ocr_text}, "finish_reason": "stop"}]
        })))
        .mount(&ocr_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("docscan_test.db");

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: format!("file:{}", db_path.display()),
            ..DatabaseConfig::default()
        },
        storage: Some(StorageConfig {
            connection_string: format!(
                "AccountName=acct;AccountKey=c2VjcmV0;BlobEndpoint={}/acct",
                blob_server.uri()
            ),
            container: "documents".to_string(),
            timeout_secs: 5,
        }),
        ocr: OcrConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(ocr_server.uri()),
            timeout_secs: 5,
            ..OcrConfig::default()
        },
    };

    let raw_db = Database::new(&config.database)
        .await
        .expect("Failed to open test database");
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));
    let storage: Arc<dyn BlobStore> = Arc::new(
        StorageProvider::new(config.storage.as_ref()).expect("Failed to configure storage"),
    );
    let ocr: Arc<dyn OcrEngine> = Arc::new(OcrProvider::new(&config.ocr));

    let app = create_router(AppState::new(config, db, storage, ocr));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    TestApp {
        addr,
        blob_server,
        ocr_server,
        _dir: dir,
    }
}
