//! TeableClient against a mock record service.

mod common;

use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::json;
use tg_onboarding::client::{RecordError, RecordId, RecordService, SubmissionFields, SubmitterId, TeableClient};
use tg_onboarding::photo::CapturedPhoto;
use tg_onboarding::store::OnboardingRecord;
use wiremock::matchers::{body_partial_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{record_config, PHOTO_FIELD_ID, QUESTIONS_TABLE_ID, TABLE_ID};

fn fields() -> SubmissionFields {
    let record = OnboardingRecord {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        instagram: "ada".into(),
        referral_source: "Friend".into(),
        ..Default::default()
    };
    SubmissionFields::from_record(&record, &SubmitterId::UserId(42))
}

fn photo() -> CapturedPhoto {
    CapturedPhoto {
        bytes: Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]),
        width: 1,
        height: 1,
        file_name: "verification.jpg".into(),
        mime_type: "image/jpeg".into(),
    }
}

#[tokio::test]
async fn test_create_record_posts_named_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/table/{}/record", TABLE_ID)))
        .and(query_param("fieldKeyType", "name"))
        .and(header("authorization", "Bearer test-api-token"))
        .and(body_partial_json(json!({
            "records": [{ "fields": {
                "First name": "Ada",
                "Last Name": "Lovelace",
                "Instagram": "ada",
                "Referral Source": "Friend",
                "status": "pending",
                "telegramID": "42"
            }}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "records": [{ "id": "rec1", "fields": {} }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TeableClient::new(record_config(&server.uri())).unwrap();
    let id = client.create_record(&fields()).await.unwrap();
    assert_eq!(id, RecordId::new("rec1"));
}

#[tokio::test]
async fn test_create_record_non_success_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/api/table/{}/record", TABLE_ID)))
        .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"message":"forbidden"}"#))
        .mount(&server)
        .await;

    let client = TeableClient::new(record_config(&server.uri())).unwrap();
    let err = client.create_record(&fields()).await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
    assert_eq!(err.body(), Some(r#"{"message":"forbidden"}"#));
}

#[tokio::test]
async fn test_create_record_without_records_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .mount(&server)
        .await;

    let client = TeableClient::new(record_config(&server.uri())).unwrap();
    let err = client.create_record(&fields()).await.unwrap_err();
    assert!(matches!(err, RecordError::Malformed(_)));
}

#[tokio::test]
async fn test_upload_attachment_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/api/table/{}/record/rec1/{}/uploadAttachment",
            TABLE_ID, PHOTO_FIELD_ID
        )))
        .and(query_param("fieldKeyType", "id"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "rec1", "fields": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TeableClient::new(record_config(&server.uri())).unwrap();
    let uploaded = client
        .upload_attachment(&RecordId::new("rec1"), &photo())
        .await
        .unwrap();
    assert_eq!(uploaded.record_id, RecordId::new("rec1"));
    assert_eq!(uploaded.response["id"], "rec1");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="file"; filename="verification.jpg""#));
    assert!(body.contains("image/jpeg"));
    assert!(body.contains(r#"name="fileUrl""#));
}

#[tokio::test]
async fn test_upload_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
        .mount(&server)
        .await;

    let client = TeableClient::new(record_config(&server.uri())).unwrap();
    let err = client
        .upload_attachment(&RecordId::new("rec1"), &photo())
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(413));
    assert_eq!(err.body(), Some("too large"));
}

#[tokio::test]
async fn test_fetch_questions_skips_blank_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/table/{}/record", QUESTIONS_TABLE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                { "id": "recQ1", "fields": { "question": "Why join?" } },
                { "id": "recQ2", "fields": { "question": "   " } },
                { "id": "recQ3", "fields": { "notes": "draft" } },
                { "id": "recQ4", "fields": { "question": "What do you build?" } }
            ]
        })))
        .mount(&server)
        .await;

    let client = TeableClient::new(record_config(&server.uri())).unwrap();
    let questions = client.fetch_questions().await.unwrap();
    let texts: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["Why join?", "What do you build?"]);
    assert_eq!(questions[0].id, "recQ1");
}
