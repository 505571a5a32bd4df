//! HTTP client for the remote scoring service.
//!
//! One POST per submission, no retries and no request timeout: a service that
//! never answers leaves the exchange pending. Every failure is folded into one
//! of the three `ExchangeError` kinds before it leaves this module.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::payload::Payload;

/// Fallback shown when the service reports an error without a message.
pub const GENERIC_SERVER_ERROR: &str = "Server error";
pub const NO_RESPONSE_MESSAGE: &str = "Error: No response from server.";
pub const REQUEST_SETUP_MESSAGE: &str = "Error: Request setup issue.";

/// One scored resume, exactly as the service returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The service answered with a non-success status (or an unreadable result).
    #[error("scoring service error (status {status}): {}", .message.as_deref().unwrap_or(GENERIC_SERVER_ERROR))]
    Server { status: u16, message: Option<String> },

    /// The request went out but no response came back.
    #[error("no response from scoring service: {0}")]
    NoResponse(#[source] reqwest::Error),

    /// The request could not be built or dispatched.
    #[error("could not set up scoring request: {0}")]
    RequestSetup(String),
}

impl ExchangeError {
    /// Status line shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ExchangeError::Server { message, .. } => format!(
                "Error: {}",
                message.as_deref().unwrap_or(GENERIC_SERVER_ERROR)
            ),
            ExchangeError::NoResponse(_) => NO_RESPONSE_MESSAGE.to_string(),
            ExchangeError::RequestSetup(_) => REQUEST_SETUP_MESSAGE.to_string(),
        }
    }
}

/// The remote side of a submission. Swappable so the orchestrator can be
/// driven without a network.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score(&self, payload: Payload) -> Result<Vec<ResultEntry>, ExchangeError>;
}

/// HTTP implementation talking multipart to the configured endpoint.
#[derive(Clone)]
pub struct HttpScoringClient {
    client: Client,
    endpoint: String,
}

impl HttpScoringClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn score(&self, payload: Payload) -> Result<Vec<ResultEntry>, ExchangeError> {
        debug!(
            "Posting {} parts ({} files) to {}",
            payload.parts().len(),
            payload.file_count(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(payload.into_form())
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ExchangeError::NoResponse)?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            warn!("Scoring service returned {status}: {message:?}");
            return Err(ExchangeError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<Vec<ResultEntry>>(&body).map_err(|e| {
            warn!("Scoring service returned {status} with an unreadable body: {e}");
            ExchangeError::Server {
                status: status.as_u16(),
                message: None,
            }
        })
    }
}

/// Errors raised before a request leaves are setup problems; everything else
/// means the service never answered.
fn classify_send_error(err: reqwest::Error) -> ExchangeError {
    if err.is_builder() {
        ExchangeError::RequestSetup(err.to_string())
    } else {
        ExchangeError::NoResponse(err)
    }
}

/// Reads the optional `message` string from an error body. Empty strings count
/// as missing.
fn extract_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use crate::files::{FileSet, ResumeFile};
    use crate::payload::build;
    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/upload")
    }

    fn payload() -> Payload {
        let mut criteria = Criteria::new();
        criteria.set_required_experience_months("12");
        criteria.set_num_shortlist("2");
        criteria.update_skill_name(0, "Rust");
        criteria.update_skill_weight(0, 100);
        criteria.update_project_name(0, "compiler");
        let mut files = FileSet::new();
        files.push(ResumeFile::new("r1.pdf", b"one".to_vec()));
        files.push(ResumeFile::new("r2.pdf", b"two".to_vec()));
        build(&criteria, &files).unwrap()
    }

    fn fixed(status: StatusCode, body: Value) -> Router {
        Router::new().route(
            "/upload",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        )
    }

    #[tokio::test]
    async fn test_success_returns_entries_in_server_order() {
        let url = spawn(fixed(
            StatusCode::OK,
            json!([{"name": "low.pdf", "score": 10}, {"name": "high.pdf", "score": 90.5}]),
        ))
        .await;

        let entries = HttpScoringClient::new(url).score(payload()).await.unwrap();
        assert_eq!(
            entries,
            vec![
                ResultEntry { name: "low.pdf".into(), score: 10.0 },
                ResultEntry { name: "high.pdf".into(), score: 90.5 },
            ]
        );
    }

    #[tokio::test]
    async fn test_error_status_carries_service_message() {
        let url = spawn(fixed(
            StatusCode::BAD_REQUEST,
            json!({"message": "Invalid file format"}),
        ))
        .await;

        let err = HttpScoringClient::new(url).score(payload()).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Server { status: 400, .. }));
        assert_eq!(err.user_message(), "Error: Invalid file format");
    }

    #[tokio::test]
    async fn test_error_without_message_falls_back() {
        let url = spawn(fixed(StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "boom"}))).await;
        let err = HttpScoringClient::new(url).score(payload()).await.unwrap_err();
        assert_eq!(err.user_message(), "Error: Server error");
    }

    #[tokio::test]
    async fn test_non_json_error_body_falls_back() {
        let router = Router::new().route(
            "/upload",
            post(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
        );
        let url = spawn(router).await;
        let err = HttpScoringClient::new(url).score(payload()).await.unwrap_err();
        assert_eq!(err.user_message(), "Error: Server error");
    }

    #[tokio::test]
    async fn test_unreadable_success_body_is_server_error() {
        let url = spawn(fixed(StatusCode::OK, json!({"unexpected": true}))).await;
        let err = HttpScoringClient::new(url).score(payload()).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Server { status: 200, message: None }));
    }

    #[tokio::test]
    async fn test_refused_connection_is_no_response() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpScoringClient::new(format!("http://{addr}/upload"))
            .score(payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NoResponse(_)));
        assert_eq!(err.user_message(), NO_RESPONSE_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_request_setup() {
        let err = HttpScoringClient::new("not a url")
            .score(payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::RequestSetup(_)));
        assert_eq!(err.user_message(), REQUEST_SETUP_MESSAGE);
    }

    #[tokio::test]
    async fn test_request_carries_multipart_fields() {
        let router = Router::new().route(
            "/upload",
            post(|mut multipart: Multipart| async move {
                let mut seen = Vec::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let label = match file_name {
                        Some(file) => format!("{name}={file}"),
                        None => format!("{name}={}", field.text().await.unwrap()),
                    };
                    seen.push(label);
                }
                Json(json!([{ "name": seen.join("&"), "score": 0 }]))
            }),
        );
        let url = spawn(router).await;

        let entries = HttpScoringClient::new(url).score(payload()).await.unwrap();
        assert_eq!(
            entries[0].name,
            "required_experience_months=12&required_skills[]=Rust&skill_weights[]=100\
             &required_projects[]=compiler&num_shortlist=2&files=r1.pdf&files=r2.pdf"
        );
    }
}
