//! Subject-area account lookup.
//!
//! Every proposal carries a free-text subject area; the settings backend
//! maps it to the ELi:SA account of the responsible subject librarian.
//! The lookup distinguishes "no account registered" from a failed call,
//! but the submission pipeline treats both as a resolution failure.

use async_trait::async_trait;
use thiserror::Error;

/// Lookup errors.
#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("account lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Remote account resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingIdentity {
    /// ELi:SA account id that should own the list entry.
    pub account_id: String,
    /// Subject area the account was resolved from.
    pub subject_area: String,
}

/// Client for the subject-to-account lookup service.
#[async_trait]
pub trait SubjectClient: Send + Sync {
    /// Look up the ELi:SA account for a subject area.
    ///
    /// `Ok(None)` means the backend answered but knows no account for
    /// this subject area.
    async fn elisa_account(&self, subject_area: &str) -> Result<Option<String>, SubjectError>;
}

/// Reqwest-backed lookup against the settings backend.
pub struct HttpSubjectClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSubjectClient {
    /// Build a client with an explicit request timeout.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SubjectClient for HttpSubjectClient {
    async fn elisa_account(&self, subject_area: &str) -> Result<Option<String>, SubjectError> {
        let url = format!("{}/elisaAccount", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("subjectArea", subject_area)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let account = response.error_for_status()?.text().await?;
        let account = account.trim();

        if account.is_empty() {
            Ok(None)
        } else {
            Ok(Some(account.to_string()))
        }
    }
}

/// Scripted lookup for tests.
pub struct MockSubjectClient {
    accounts: std::collections::HashMap<String, String>,
    fail: bool,
}

impl MockSubjectClient {
    /// Lookup that knows no accounts at all.
    pub fn empty() -> Self {
        Self {
            accounts: std::collections::HashMap::new(),
            fail: false,
        }
    }

    /// Lookup that resolves a single subject area.
    pub fn with_account(subject_area: &str, account_id: &str) -> Self {
        let mut accounts = std::collections::HashMap::new();
        accounts.insert(subject_area.to_string(), account_id.to_string());
        Self {
            accounts,
            fail: false,
        }
    }

    /// Lookup whose calls fail at the transport level.
    pub fn failing() -> Self {
        Self {
            accounts: std::collections::HashMap::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SubjectClient for MockSubjectClient {
    async fn elisa_account(&self, subject_area: &str) -> Result<Option<String>, SubjectError> {
        if self.fail {
            return Err(anyhow::anyhow!("scripted lookup failure").into());
        }
        Ok(self.accounts.get(subject_area).cloned())
    }
}
