//! Request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::ApiState;
use crate::elisa::Title;
use crate::request::AcquisitionRequest;
use crate::submit::{EscalationReason, SubmissionOutcome};

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health(State(_state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Process one acquisition proposal from the upstream form.
///
/// The response class depends solely on the outcome: success and the
/// missing-ISBN case acknowledge with 200 (the latter is benign by
/// contract), every other escalation answers 400 with a short diagnostic.
pub async fn send_eav(
    State(state): State<Arc<ApiState>>,
    Form(request): Form<AcquisitionRequest>,
) -> (StatusCode, String) {
    match state.submitter.submit(&request).await {
        SubmissionOutcome::Submitted { .. } => (StatusCode::OK, "List created".to_string()),
        SubmissionOutcome::Escalated(reason) => response_for(reason),
    }
}

fn response_for(reason: EscalationReason) -> (StatusCode, String) {
    match reason {
        EscalationReason::InvalidIsbn => {
            (StatusCode::OK, "Please provide an ISBN".to_string())
        }
        EscalationReason::AccountResolutionFailed => (
            StatusCode::BAD_REQUEST,
            "could not retrieve ELi:SA account id".to_string(),
        ),
        EscalationReason::RemoteUnreachable => (
            StatusCode::BAD_REQUEST,
            "could not connect to ELi:SA API".to_string(),
        ),
        EscalationReason::AuthenticationRejected(_) => {
            (StatusCode::BAD_REQUEST, "no token received".to_string())
        }
        // the remote message is surfaced to the caller verbatim
        EscalationReason::ListCreationRejected(message) => (StatusCode::BAD_REQUEST, message),
    }
}

/// Request to forward pre-built titles to an account.
#[derive(Debug, Deserialize)]
pub struct ForwardRequest {
    /// Target ELi:SA account; the configured default is used when absent.
    #[serde(rename = "userID", default)]
    pub user_id: Option<String>,

    /// Titles to put on the list.
    #[serde(rename = "titleList")]
    pub title_list: Vec<Title>,
}

/// Forward pre-built titles, fire-and-forget.
///
/// Answers 202 immediately; the remote submission runs in the background
/// and its failures end up in the log only. No correctness guarantee is
/// attached to this endpoint.
pub async fn send_to_elisa(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ForwardRequest>,
) -> StatusCode {
    tokio::spawn(async move {
        state
            .submitter
            .forward(request.user_id, request.title_list)
            .await;
    });

    StatusCode::ACCEPTED
}
