//! REST adapter for the academy backend.
//!
//! Wraps the backend's per-collection endpoints using [`reqwest`]:
//!
//! | operation     | request                                 |
//! |---------------|-----------------------------------------|
//! | create        | `POST   {base}/{collection}/`           |
//! | update        | `PUT    {base}/{collection}/{id}`       |
//! | delete (hard) | `DELETE {base}/{collection}/{id}/hard`  |
//! | delete (soft) | `DELETE {base}/{collection}/{id}`       |
//! | list          | `GET    {base}/{collection}/`           |

use async_trait::async_trait;
use hakwon_core::types::record_from_value;
use hakwon_core::{EntityId, EntityType, Record};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;

use crate::config::{ClientConfig, DeleteMode};
use crate::error::RemoteError;
use crate::store::RemoteStore;

/// HTTP client for the backend REST API.
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    delete_mode: DeleteMode,
}

impl HttpRemoteStore {
    /// Build a client with the configured request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
            delete_mode: config.delete_mode,
        }
    }

    fn collection_url(&self, entity: EntityType) -> String {
        format!("{}/{}/", self.base_url, entity.collection())
    }

    fn record_url(&self, entity: EntityType, id: &EntityId) -> String {
        format!("{}/{}/{}", self.base_url, entity.collection(), id)
    }

    fn delete_url(&self, entity: EntityType, id: &EntityId) -> String {
        match self.delete_mode {
            DeleteMode::Hard => format!("{}/hard", self.record_url(entity, id)),
            DeleteMode::Soft => self.record_url(entity, id),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`RemoteError::Api`], prefixing the
    /// message with `context` (e.g. `"Failed to update students 3"`).
    async fn ensure_success(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<Value>().await.ok();
        let reason = status.canonical_reason().unwrap_or("Unknown status");
        let message = api_error_message(context, reason, body.as_ref());
        tracing::warn!(status = status.as_u16(), %message, "Backend rejected request");

        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_record(response: reqwest::Response) -> Result<Record, RemoteError> {
        let body = response.json::<Value>().await?;
        record_from_value(body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create_entity(
        &self,
        entity: EntityType,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        let url = self.collection_url(entity);
        tracing::debug!(%url, "POST");

        let response = self
            .authorized(self.client.post(&url))
            .json(data)
            .send()
            .await?;
        let response =
            Self::ensure_success(response, &format!("Failed to create {entity}")).await?;
        Self::parse_record(response).await
    }

    async fn update_entity(
        &self,
        entity: EntityType,
        id: &EntityId,
        data: &Record,
    ) -> Result<Record, RemoteError> {
        let url = self.record_url(entity, id);
        tracing::debug!(%url, "PUT");

        let response = self
            .authorized(self.client.put(&url))
            .json(data)
            .send()
            .await?;
        let response =
            Self::ensure_success(response, &format!("Failed to update {entity} {id}")).await?;
        Self::parse_record(response).await
    }

    async fn delete_entity(&self, entity: EntityType, id: &EntityId) -> Result<Value, RemoteError> {
        let url = self.delete_url(entity, id);
        tracing::debug!(%url, "DELETE");

        let response = self.authorized(self.client.delete(&url)).send().await?;
        let response =
            Self::ensure_success(response, &format!("Failed to delete {entity} {id}")).await?;

        // Some delete endpoints answer 204 with no body.
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn list_entities(&self, entity: EntityType) -> Result<Vec<Record>, RemoteError> {
        let url = self.collection_url(entity);
        tracing::debug!(%url, "GET");

        let response = self
            .authorized(self.client.get(&url))
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;
        let response =
            Self::ensure_success(response, &format!("Failed to fetch {entity}")).await?;
        let body = response.json::<Value>().await?;
        records_from_list_body(entity, body)
    }
}

/// Build a user-facing message from an error response.
///
/// Validation failures (`detail` is a list of `{loc, msg}` objects) are
/// summarized field by field; a plain `detail` string is appended to the
/// status line.
pub fn api_error_message(context: &str, reason: &str, body: Option<&Value>) -> String {
    let base = format!("{context}: {reason}");
    let Some(detail) = body.and_then(|b| b.get("detail")) else {
        return base;
    };

    match detail {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(describe_validation_item).collect();
            format!("데이터 검증 실패: {}", parts.join(", "))
        }
        Value::String(s) => format!("{base} - {s}"),
        Value::Null => base,
        other => format!("{base} - {other}"),
    }
}

fn describe_validation_item(item: &Value) -> String {
    let loc = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .map(|p| match p {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let msg = item.get("msg").and_then(Value::as_str).unwrap_or("");
    format!("{loc}: {msg}")
}

/// Accept either `{"<collection>": [...]}` or a bare array.
pub fn records_from_list_body(entity: EntityType, body: Value) -> Result<Vec<Record>, RemoteError> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove(entity.collection()) {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(RemoteError::Decode(format!(
                    "expected '{}' array in list response",
                    entity.collection()
                )))
            }
        },
        other => {
            return Err(RemoteError::Decode(format!(
                "expected list response, got {other}"
            )))
        }
    };

    rows.into_iter()
        .map(|row| record_from_value(row).map_err(|e| RemoteError::Decode(e.to_string())))
        .collect()
}
