//! HTTP client for the backend's request workflow endpoints.
//!
//! The client does not validate anything: run the change through the status
//! workflow first and only push what it accepted.

use sarms_core::RequestStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("backend rejected the update: {0}")]
    Rejected(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Body of `PUT /requests/{id}/status`.
#[derive(Debug, Serialize)]
struct UpdateStatusBody<'a> {
    #[serde(rename = "Status")]
    status: RequestStatus,
    #[serde(rename = "Remark", skip_serializing_if = "Option::is_none")]
    remark: Option<&'a str>,
}

/// Body of `PUT /requests/{id}/assign`.
#[derive(Debug, Serialize)]
struct AssignBody<'a> {
    #[serde(rename = "ProjectManagerEmail")]
    project_manager_email: &'a str,
}

/// Response envelope shared by every backend endpoint.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(alias = "Success")]
    success: bool,
    #[serde(default, alias = "Message")]
    message: Option<String>,
    #[serde(default, alias = "Errors")]
    errors: Vec<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<(), SyncError> {
        if self.success {
            return Ok(());
        }
        let mut reason = self
            .message
            .unwrap_or_else(|| "no message from backend".to_string());
        if !self.errors.is_empty() {
            reason.push_str(": ");
            reason.push_str(&self.errors.join("; "));
        }
        Err(SyncError::Rejected(reason))
    }
}

/// Client for the backend REST API.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// `base_url` is the API root, e.g. `https://localhost:5001/api`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn status_url(&self, id: &str) -> String {
        format!("{}/requests/{}/status", self.base_url, id)
    }

    fn assign_url(&self, id: &str) -> String {
        format!("{}/requests/{}/assign", self.base_url, id)
    }

    /// Set a request's status, with the rejection/hold remark when present.
    pub async fn update_status(
        &self,
        id: &str,
        status: RequestStatus,
        remark: Option<&str>,
    ) -> Result<(), SyncError> {
        let url = self.status_url(id);
        info!(url = %url, %status, "pushing status change");
        let body = UpdateStatusBody { status, remark };
        self.put(&url, &body).await
    }

    /// Assign a project manager by email.
    pub async fn assign(&self, id: &str, project_manager_email: &str) -> Result<(), SyncError> {
        let url = self.assign_url(id);
        info!(url = %url, assignee = %project_manager_email, "pushing assignment");
        let body = AssignBody {
            project_manager_email,
        };
        self.put(&url, &body).await
    }

    async fn put<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<(), SyncError> {
        let resp = self.client.put(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SyncError::Server {
                status: status.as_u16(),
                body: text,
            });
        }
        let envelope: ApiResponse = serde_json::from_str(&text)?;
        envelope.into_result()
    }
}
