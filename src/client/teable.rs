//! TeableClient — record service client over Teable's REST API.
//!
//! Endpoints used:
//! - `POST /api/table/{table}/record?fieldKeyType=name` — create the submission row
//! - `POST /api/table/{table}/record/{record}/{field}/uploadAttachment?fieldKeyType=id` — attach the selfie
//! - `GET  /api/table/{questions_table}/record` — list onboarding questions

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use url::Url;

use super::{Question, RecordError, RecordId, RecordService, SubmissionFields, UploadedAttachment};
use crate::core::config::{network, RecordApiConfig};
use crate::photo::CapturedPhoto;

#[derive(Debug, Deserialize)]
struct RecordsPage {
    #[serde(default)]
    records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: String,
    #[serde(default)]
    fields: serde_json::Map<String, JsonValue>,
}

pub struct TeableClient {
    http: Client,
    config: RecordApiConfig,
}

impl TeableClient {
    pub fn new(config: RecordApiConfig) -> Result<Self, RecordError> {
        let http = Client::builder()
            .user_agent(concat!("tg-onboarding/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(network::connect_timeout())
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RecordApiConfig {
        &self.config
    }

    fn questions_token(&self) -> &SecretString {
        self.config.questions_token.as_ref().unwrap_or(&self.config.api_token)
    }
}

/// Appends path segments to `base`, keeping any path prefix it already has.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, RecordError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RecordError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn ensure_success(response: Response) -> Result<Response, RecordError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RecordError::Status { status, body })
}

#[async_trait]
impl RecordService for TeableClient {
    async fn create_record(&self, fields: &SubmissionFields) -> Result<RecordId, RecordError> {
        let mut url = endpoint(
            &self.config.base_url,
            &["api", "table", self.config.table_id.as_str(), "record"],
        )?;
        url.query_pairs_mut().append_pair("fieldKeyType", "name");

        log::info!("Creating record in table {}", self.config.table_id);
        let response = self
            .http
            .post(url)
            .bearer_auth(self.config.api_token.expose_secret())
            .header(ACCEPT, "application/json")
            .json(&json!({ "records": [{ "fields": fields }] }))
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let page: RecordsPage = response.json().await?;
        let record = page
            .records
            .into_iter()
            .next()
            .ok_or_else(|| RecordError::Malformed("create response contains no records".to_string()))?;

        log::info!("Record created with ID: {}", record.id);
        Ok(RecordId::new(record.id))
    }

    async fn upload_attachment(
        &self,
        record_id: &RecordId,
        photo: &CapturedPhoto,
    ) -> Result<UploadedAttachment, RecordError> {
        let mut url = endpoint(
            &self.config.upload_base_url,
            &[
                "api",
                "table",
                self.config.table_id.as_str(),
                "record",
                record_id.as_str(),
                self.config.photo_field_id.as_str(),
                "uploadAttachment",
            ],
        )?;
        url.query_pairs_mut().append_pair("fieldKeyType", "id");

        let part = Part::bytes(photo.bytes.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str(&photo.mime_type)?;
        let form = Form::new().part("file", part).text("fileUrl", "");

        log::info!("Uploading attachment ({} bytes) to record {}", photo.bytes.len(), record_id);
        let response = self
            .http
            .post(url)
            .bearer_auth(self.config.api_token.expose_secret())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;
        let response = match ensure_success(response).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Upload failed for record {}: {}", record_id, e);
                return Err(e);
            }
        };

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&text).map_err(|e| RecordError::Malformed(format!("upload response: {}", e)))?
        };

        log::info!("Attachment uploaded successfully to record {}", record_id);
        Ok(UploadedAttachment {
            record_id: record_id.clone(),
            response: body,
        })
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, RecordError> {
        let url = endpoint(
            &self.config.base_url,
            &["api", "table", self.config.questions_table_id.as_str(), "record"],
        )?;

        let response = self
            .http
            .get(url)
            .bearer_auth(self.questions_token().expose_secret())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let page: RecordsPage = response.json().await?;

        let questions: Vec<Question> = page
            .records
            .into_iter()
            .filter_map(|record| {
                let text = record.fields.get("question")?.as_str()?.trim().to_string();
                (!text.is_empty()).then(|| Question::new(record.id, text))
            })
            .collect();

        log::info!("Fetched {} questions", questions.len());
        Ok(questions)
    }
}
