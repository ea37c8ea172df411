//! Multipart upload tests.

mod common;

use common::TestBackend;
use nexthara_client::{DocumentMetadata, Error, UploadFile};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn body_text(request: &wiremock::Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

#[tokio::test]
async fn test_upload_includes_only_supplied_metadata() {
    let backend = TestBackend::start_with_token("tok").await;

    Mock::given(method("POST"))
        .and(path("/api/applications/APP-1/documents"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "doc-1"})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let file = UploadFile::new("passport.pdf", b"%PDF-1.4 fake".to_vec())
        .with_mime("application/pdf");
    let body = backend
        .client
        .documents()
        .upload("APP-1", file, &DocumentMetadata::named("Passport"))
        .await
        .unwrap();
    assert_eq!(body["id"], "doc-1");

    let request = backend.only_request().await;
    let content_type = request
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(
        content_type.starts_with("multipart/form-data; boundary="),
        "{content_type}"
    );

    let text = body_text(&request);
    assert!(text.contains(r#"name="file"; filename="passport.pdf""#), "{text}");
    assert!(text.contains("%PDF-1.4 fake"));
    assert!(text.contains(r#"name="doc_name""#));
    assert!(text.contains("Passport"));
    assert!(!text.contains(r#"name="label""#));
    assert!(!text.contains(r#"name="owner""#));
    assert!(!text.contains(r#"name="doc_category""#));
}

#[tokio::test]
async fn test_upload_all_metadata() {
    let backend = TestBackend::start_with_token("tok").await;

    Mock::given(method("POST"))
        .and(path("/api/leads/L-4/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&backend.server)
        .await;

    let metadata = DocumentMetadata::named("Form 16")
        .with_category("income")
        .with_owner("co_applicant")
        .with_label("FY 2025-26");
    backend
        .client
        .leads()
        .upload_document("L-4", UploadFile::new("form16.pdf", vec![1, 2, 3]), &metadata)
        .await
        .unwrap();

    let text = body_text(&backend.only_request().await);
    for name in ["file", "doc_name", "doc_category", "owner", "label"] {
        assert!(text.contains(&format!(r#"name="{name}""#)), "missing {name}");
    }
}

#[tokio::test]
async fn test_upload_without_token() {
    let backend = TestBackend::start().await;

    Mock::given(method("POST"))
        .and(path("/api/applications/APP-1/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&backend.server)
        .await;

    backend
        .client
        .documents()
        .upload("APP-1", UploadFile::new("a.txt", "hi"), &DocumentMetadata::default())
        .await
        .unwrap();

    let request = backend.only_request().await;
    assert!(request.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_upload_failure_fallback() {
    let backend = TestBackend::start_with_token("tok").await;

    Mock::given(method("POST"))
        .and(path("/api/applications/APP-1/documents"))
        .respond_with(ResponseTemplate::new(413).set_body_string("Payload Too Large"))
        .mount(&backend.server)
        .await;

    let err = backend
        .client
        .documents()
        .upload("APP-1", UploadFile::new("big.pdf", vec![0; 16]), &DocumentMetadata::default())
        .await
        .unwrap_err();
    match err {
        Error::RequestFailed { status, message } => {
            assert_eq!(status, 413);
            assert_eq!(message, "Upload failed");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_server_message() {
    let backend = TestBackend::start_with_token("tok").await;

    Mock::given(method("POST"))
        .and(path("/api/applications/APP-1/documents"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Only PDF or images allowed"})),
        )
        .mount(&backend.server)
        .await;

    let err = backend
        .client
        .documents()
        .upload("APP-1", UploadFile::new("x.exe", vec![0]), &DocumentMetadata::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Only PDF or images allowed");
}

#[tokio::test]
async fn test_upload_401_expires_session() {
    let backend = TestBackend::start_with_token("stale").await;

    Mock::given(method("POST"))
        .and(path("/api/applications/APP-1/documents"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&backend.server)
        .await;

    let err = backend
        .client
        .documents()
        .upload("APP-1", UploadFile::new("a.pdf", vec![0]), &DocumentMetadata::default())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!backend.session.has_token());
    assert_eq!(backend.logout_count(), 1);
}

#[tokio::test]
async fn test_upload_to_non_upload_endpoint() {
    let backend = TestBackend::start_with_token("tok").await;

    let err = backend
        .client
        .upload::<serde_json::Value>(
            "documents.list",
            nexthara_client::CallArgs::id("APP-1"),
            UploadFile::new("a.pdf", vec![0]),
            &DocumentMetadata::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCall { .. }));
}
