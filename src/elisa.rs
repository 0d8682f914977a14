//! ELi:SA API client.
//!
//! The remote protocol is a two-step JSON exchange: `getToken` trades a
//! signed [`AuthenticationRequest`](crate::elisa::AuthenticationRequest)
//! for a short-lived token, `createList` then creates the acquisition list
//! under that token. Both responses carry an `errorcode` where 0 means
//! success; everything else is a rejection with a human-readable message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthCredential;
use crate::entry::ListEntry;

/// Client errors. Remote rejections are not errors at this level; they are
/// regular responses with a non-zero `errorcode`.
#[derive(Debug, Error)]
pub enum ElisaError {
    #[error("ELi:SA API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Wire form of the signed credential.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticationRequest {
    #[serde(rename = "callerID")]
    pub caller_id: String,
    pub timestamp: String,
    pub hash: String,
}

impl From<AuthCredential> for AuthenticationRequest {
    fn from(credential: AuthCredential) -> Self {
        Self {
            caller_id: credential.caller_id,
            timestamp: credential.timestamp,
            hash: credential.hash,
        }
    }
}

/// Response to the authentication call.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticationResponse {
    pub errorcode: i32,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

/// One title entry on the remote list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleData {
    /// Normalized ISBN, hyphens removed.
    pub isbn: String,

    /// Staff-facing note about the requester and their comment.
    #[serde(rename = "notizIntern", skip_serializing_if = "Option::is_none", default)]
    pub note_intern: Option<String>,

    /// Library note with site markers and the pickup line.
    #[serde(rename = "notiz", skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

/// Wrapper the remote API expects around each title entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Title {
    pub title: TitleData,
}

impl Title {
    pub fn new(title: TitleData) -> Self {
        Self { title }
    }
}

/// Request to create an acquisition list.
#[derive(Debug, Clone, Serialize)]
pub struct CreateListRequest {
    pub token: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "notepadName")]
    pub notepad_name: String,
    #[serde(rename = "titleList")]
    pub title_list: Vec<Title>,
}

impl CreateListRequest {
    /// Combine the token from the authentication step with a built entry.
    pub fn new(token: String, entry: ListEntry) -> Self {
        Self {
            token,
            user_id: entry.account_id,
            notepad_name: entry.category,
            title_list: entry.titles.into_iter().map(Title::new).collect(),
        }
    }
}

/// Response to the create-list call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListResponse {
    pub errorcode: i32,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

/// Client for the ELi:SA API.
///
/// Abstracted as a trait so the submission pipeline can be exercised in
/// tests without real HTTP calls.
#[async_trait]
pub trait ElisaClient: Send + Sync {
    /// Trade a signed credential for a token.
    async fn get_token(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationResponse, ElisaError>;

    /// Create an acquisition list under a previously obtained token.
    async fn create_list(
        &self,
        request: &CreateListRequest,
    ) -> Result<CreateListResponse, ElisaError>;
}

/// Production client using reqwest.
pub struct HttpElisaClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpElisaClient {
    /// Build a client with an explicit request timeout.
    ///
    /// The remote protocol specifies no deadline of its own, so one is
    /// imposed here; a hanging call would otherwise block its request
    /// task indefinitely.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ElisaClient for HttpElisaClient {
    async fn get_token(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationResponse, ElisaError> {
        let url = format!("{}/getToken", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<AuthenticationResponse>()
            .await?;
        Ok(response)
    }

    async fn create_list(
        &self,
        request: &CreateListRequest,
    ) -> Result<CreateListResponse, ElisaError> {
        let url = format!("{}/createList", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<CreateListResponse>()
            .await?;
        Ok(response)
    }
}

// ============================================================================
// Mock implementation for tests
// ============================================================================

use std::sync::Mutex;

/// Scripted ELi:SA client that records every call.
///
/// Responses are configured up front; calls are recorded so tests can
/// assert that, for example, `createList` is never reached after a
/// rejected authentication.
pub struct MockElisaClient {
    auth_response: Mutex<Option<Result<AuthenticationResponse, ElisaError>>>,
    create_response: Mutex<Option<Result<CreateListResponse, ElisaError>>>,
    create_calls: Mutex<Vec<CreateListRequest>>,
    auth_calls: Mutex<Vec<AuthenticationRequest>>,
}

impl MockElisaClient {
    /// Client that accepts authentication and list creation.
    pub fn accepting() -> Self {
        Self::new(
            Ok(AuthenticationResponse {
                errorcode: 0,
                token: Some("test-token".to_string()),
                error_message: None,
            }),
            Ok(CreateListResponse {
                errorcode: 0,
                error_message: None,
            }),
        )
    }

    /// Client with explicit scripted responses.
    pub fn new(
        auth: Result<AuthenticationResponse, ElisaError>,
        create: Result<CreateListResponse, ElisaError>,
    ) -> Self {
        Self {
            auth_response: Mutex::new(Some(auth)),
            create_response: Mutex::new(Some(create)),
            create_calls: Mutex::new(Vec::new()),
            auth_calls: Mutex::new(Vec::new()),
        }
    }

    /// Client whose authentication call fails at the transport level.
    pub fn unreachable() -> Self {
        Self::new(
            Err(anyhow::anyhow!("connection refused").into()),
            Err(anyhow::anyhow!("connection refused").into()),
        )
    }

    /// Client that rejects authentication with the given message.
    pub fn rejecting_auth(errorcode: i32, message: &str) -> Self {
        Self::new(
            Ok(AuthenticationResponse {
                errorcode,
                token: None,
                error_message: Some(message.to_string()),
            }),
            Ok(CreateListResponse {
                errorcode: 0,
                error_message: None,
            }),
        )
    }

    /// Client that accepts authentication but rejects list creation.
    pub fn rejecting_create(errorcode: i32, message: &str) -> Self {
        Self::new(
            Ok(AuthenticationResponse {
                errorcode: 0,
                token: Some("test-token".to_string()),
                error_message: None,
            }),
            Ok(CreateListResponse {
                errorcode,
                error_message: Some(message.to_string()),
            }),
        )
    }

    /// Authentication requests seen so far.
    pub fn auth_calls(&self) -> Vec<AuthenticationRequest> {
        self.auth_calls.lock().unwrap().clone()
    }

    /// Create-list requests seen so far.
    pub fn create_calls(&self) -> Vec<CreateListRequest> {
        self.create_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ElisaClient for MockElisaClient {
    async fn get_token(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationResponse, ElisaError> {
        self.auth_calls.lock().unwrap().push(request.clone());
        self.auth_response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted auth response left").into()))
    }

    async fn create_list(
        &self,
        request: &CreateListRequest,
    ) -> Result<CreateListResponse, ElisaError> {
        self.create_calls.lock().unwrap().push(request.clone());
        self.create_response
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted create response left").into()))
    }
}
