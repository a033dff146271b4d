//! Ingest API integration tests.
//!
//! Run with: `cargo test -p catflow-api --test ingest_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use catflow_broker::queue_name_for;
use catflow_core::AnnouncementFormat;
use catflow_storage::{Storage, StorageKey};
use helpers::{
    setup_test_app, setup_test_app_with_failing_storage, setup_test_app_with_keys,
    setup_test_app_without_broker,
};

fn file_form(filename: &str, mime: &str, data: &[u8]) -> MultipartForm {
    let part = Part::bytes(Bytes::copy_from_slice(data))
        .file_name(filename.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part("file", part)
}

#[tokio::test]
async fn test_ingest_car_mp4_announces_on_both_queues() {
    let app = setup_test_app().await;
    let video = b"\x00\x00\x00\x18ftypmp42 fake video payload".to_vec();

    let response = app
        .client()
        .post("/ingest")
        .multipart(file_form("car.mp4", "video/mp4", &video))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!({ "status": "success" }));

    let ingest = app.broker.drain(&queue_name_for("ingest"));
    let detect = app.broker.drain(&queue_name_for("detect"));
    assert_eq!(ingest.len(), 1);
    assert_eq!(detect.len(), 1);
    assert_eq!(ingest[0], detect[0]);

    let records = AnnouncementFormat::Json.decode(&ingest[0]).unwrap();
    assert_eq!(records.len(), 1);
    let key = StorageKey::parse(&records[0].key).unwrap();
    assert_eq!(key.extension(), "mp4");
    assert!(records[0].key.ends_with(".mp4"));

    let stored = app.storage.download(&records[0].key).await.unwrap();
    assert_eq!(stored.as_ref(), video.as_slice());
}

#[tokio::test]
async fn test_ingest_payload_is_json_array_of_one_record() {
    let app = setup_test_app_with_keys(&["ingest"]).await;

    let response = app
        .client()
        .post("/ingest")
        .multipart(file_form("frame.jpg", "image/jpeg", b"jpeg"))
        .await;
    assert_eq!(response.status_code(), 200);

    let messages = app.broker.drain("ingest_queue");
    let payload: serde_json::Value = serde_json::from_slice(&messages[0]).unwrap();
    let array = payload.as_array().unwrap();
    assert_eq!(array.len(), 1);
    assert!(array[0]["key"].as_str().unwrap().ends_with(".jpg"));
}

#[tokio::test]
async fn test_ingest_without_file_field_is_400() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/ingest")
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.broker.published().is_empty());
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_ingest_oversize_is_413() {
    let app = setup_test_app().await;
    let too_big = vec![7u8; 2 * 1024 * 1024];

    let response = app
        .client()
        .post("/ingest")
        .multipart(file_form("big.bin", "application/octet-stream", &too_big))
        .await;

    assert_eq!(response.status_code(), 413);
    assert!(app.broker.published().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_500_and_nothing_published() {
    let (server, broker) = setup_test_app_with_failing_storage().await;

    let response = server
        .post("/ingest")
        .multipart(file_form("car.mp4", "video/mp4", b"video"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("The specified bucket does not exist"));
    assert!(broker.published().is_empty());
}

#[tokio::test]
async fn test_severed_broker_is_500_and_nothing_stored() {
    let app = setup_test_app().await;
    app.broker.sever();

    let response = app
        .client()
        .post("/ingest")
        .multipart(file_form("car.mp4", "video/mp4", b"video"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BROKER_CONNECTIVITY_ERROR");
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_missing_broker_is_500() {
    let server = setup_test_app_without_broker().await;

    let response = server
        .post("/ingest")
        .multipart(file_form("car.mp4", "video/mp4", b"video"))
        .await;

    assert_eq!(response.status_code(), 500);
}

#[tokio::test]
async fn test_failed_announcement_is_500_but_object_is_kept() {
    let app = setup_test_app().await;
    app.broker.fail_routing_key("detect");

    let response = app
        .client()
        .post("/ingest")
        .multipart(file_form("car.mp4", "video/mp4", b"video"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PARTIAL_ANNOUNCEMENT");
    assert!(body["detail"].as_str().unwrap().contains("detect"));
    assert_eq!(app.stored_file_count(), 1);
    assert_eq!(app.broker.queue_len("ingest_queue"), 1);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = setup_test_app().await;

    let response = app.client().get("/live").await;

    let request_id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_ingest_keeps_caller_request_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/ingest")
        .add_header("x-request-id", "ingest-req-1")
        .multipart(file_form("car.mp4", "video/mp4", b"video"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("x-request-id"), "ingest-req-1");
    assert_eq!(app.broker.queue_len(&queue_name_for("ingest")), 1);
}
