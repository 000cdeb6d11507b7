mod common;

use common::{sample_png, spawn_app};
use pretty_assertions::assert_eq;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

fn upload_form(filename: &str, bytes: Vec<u8>) -> Form {
    Form::new().part(
        "file",
        Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("image/png")
            .unwrap(),
    )
}

#[tokio::test]
async fn test_greeting() {
    let app = spawn_app("unused").await;

    let body: Value = reqwest::get(app.url("/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!({"Hello": "FastAPI"}));
}

#[tokio::test]
async fn test_upload_stores_blob_and_text() {
    let app = spawn_app("Total due: 42.00").await;
    let client = reqwest::Client::new();

    let response = client
        .post(app.url("/upload/"))
        .multipart(upload_form("receipt.png", sample_png()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["filename"], "receipt.png");
    assert_eq!(body["text"], "Total due: 42.00");

    let blob_url = body["blob_url"].as_str().unwrap();
    assert!(blob_url.starts_with(&app.blob_base()));
    assert!(blob_url.ends_with("-receipt.png"));

    let puts = app.blob_server.received_requests().await.unwrap();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].url.as_str(), blob_url);
    assert_eq!(puts[0].body, sample_png());
    assert_eq!(
        puts[0].headers.get("x-ms-blob-type").unwrap().to_str().unwrap(),
        "BlockBlob"
    );
    assert!(puts[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("SharedKey acct:"));

    let ocr_calls = app.ocr_server.received_requests().await.unwrap();
    assert_eq!(ocr_calls.len(), 1);
}

#[tokio::test]
async fn test_upload_then_fetch() {
    let app = spawn_app("hello").await;
    let client = reqwest::Client::new();

    let uploaded: Value = client
        .post(app.url("/upload"))
        .multipart(upload_form("note.png", sample_png()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = uploaded["id"].as_i64().unwrap();

    let response = client
        .get(app.url(&format!("/documents/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched, uploaded);
}

#[tokio::test]
async fn test_concurrent_uploads_same_filename() {
    let app = spawn_app("same").await;
    let client = reqwest::Client::new();

    let requests = (0..4).map(|_| {
        client
            .post(app.url("/upload/"))
            .multipart(upload_form("scan.png", sample_png()))
            .send()
    });
    let responses = futures::future::join_all(requests).await;

    let mut urls = Vec::new();
    let mut ids = Vec::new();
    for response in responses {
        let body: Value = response.unwrap().json().await.unwrap();
        urls.push(body["blob_url"].as_str().unwrap().to_string());
        ids.push(body["id"].as_i64().unwrap());
    }
    urls.sort();
    urls.dedup();
    ids.sort();
    ids.dedup();
    assert_eq!(urls.len(), 4);
    assert_eq!(ids.len(), 4);
}

#[tokio::test]
async fn test_missing_document_is_404() {
    let app = spawn_app("unused").await;

    let response = reqwest::get(app.url("/documents/999")).await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Document 999 not found");
}

#[tokio::test]
async fn test_invalid_image_skips_storage_and_ocr() {
    let app = spawn_app("unused").await;
    let client = reqwest::Client::new();

    let response = client
        .post(app.url("/upload/"))
        .multipart(upload_form("broken.png", b"definitely not a png".to_vec()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert!(app.blob_server.received_requests().await.unwrap().is_empty());
    assert!(app.ocr_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_reports_configured_backends() {
    let app = spawn_app("unused").await;

    let body: Value = reqwest::get(app.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ocr"]["engine"], "openai/gpt-4o-mini");
    assert_eq!(body["storage"]["enabled"], true);
    assert_eq!(body["storage"]["backend"], "azure");
}
